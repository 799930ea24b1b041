use std::fmt::Write as _;

use game_core::{CandidateSet, RoundState};
use shared::domain::PlayerId;
use wiki_integration::RenderedDocument;

pub const INTRO: &str = "\
Read One Article

In this game, there are two roles: the investigator and liar. Every round you
will swap between those roles. The liar will be presented with two random
Wikipedia pages. They will only be able to read one of those.

Then the investigator will see the titles of both pages, and given the
opportunity to ask any questions about both.

Will the investigator find out which page the liar made up?

Inspired by \"Two Of These People Are Lying\" by Tom Scott and Matt Grey.
";

pub fn choosing(state: &RoundState) -> String {
    format!(
        "It is now the turn of the liar ({}). To read up on one topic, please pick one of these articles:\n  1. Article 1\n  2. Article 2",
        state.liar
    )
}

pub fn reading(doc: &RenderedDocument) -> String {
    format!("{}\n{}\n\n{}\n", doc.title, doc.subtitle, doc.body)
}

pub fn preguessing(state: &RoundState) -> String {
    format!(
        "{} has finished reading. Hand over to the investigator ({}) and start guessing when the questions begin.",
        state.liar, state.investigator
    )
}

pub fn guessing(state: &RoundState, candidates: &CandidateSet) -> String {
    let mut out = format!(
        "It is now the turn of the investigator ({}). You now can ask questions about all these articles. Once you think you know which article the person read, make a guess!\n",
        state.investigator
    );
    for (i, article) in candidates.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, article.title);
    }
    out
}

/// Outcome, both articles with links, and scores in seating order.
pub fn recap(state: &RoundState, candidates: &CandidateSet, players: &[PlayerId; 2]) -> String {
    let title = state
        .chosen_article
        .as_ref()
        .map_or("?", |article| article.title.as_str());
    let mut out = if state.guess_correct {
        format!(
            "The investigator, {} won! {} did read about {}\n",
            state.investigator, state.liar, title
        )
    } else {
        format!(
            "The liar, {} won! {} actually read about {}\n",
            state.liar, state.liar, title
        )
    };

    out.push_str("\nread the articles:\n");
    for article in candidates.iter() {
        let _ = writeln!(out, "  {} <{}>", article.title, article.full_url);
    }
    out.push_str("\nscores:\n");
    for player in players {
        let _ = writeln!(out, "  {}: {}", player, state.points.get(player));
    }
    out
}
