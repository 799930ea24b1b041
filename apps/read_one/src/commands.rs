//! Typed-in player commands.

use game_core::CandidateSet;
use shared::{domain::Stage, protocol::Action};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Action),
    Quit,
    Unknown(String),
}

/// Word commands map to the same action in every stage so that out-of-stage
/// input reaches the round engine and is rejected there. Numbers pick a
/// candidate and mean "choose" or "guess" depending on the stage.
pub fn parse_command(line: &str, stage: Stage, candidates: &CandidateSet) -> Command {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "quit" | "exit" => return Command::Quit,
        "stop" => return Command::Dispatch(Action::Stop),
        "done" => return Command::Dispatch(Action::DoneReading),
        "start" => return Command::Dispatch(Action::StartGuessing),
        "next" => return Command::Dispatch(Action::NextRound),
        _ => {}
    }

    let Ok(index) = line.parse::<usize>() else {
        return Command::Unknown(hint(stage).to_string());
    };
    let Some(article) = index
        .checked_sub(1)
        .and_then(|i| candidates.articles().get(i))
    else {
        let count = candidates.articles().len();
        return Command::Unknown(format!("pick an article between 1 and {count}"));
    };

    let page_id = article.page_id;
    match stage {
        Stage::Choosing => Command::Dispatch(Action::ChooseArticle { page_id }),
        _ => Command::Dispatch(Action::Guess { page_id }),
    }
}

pub fn hint(stage: Stage) -> &'static str {
    match stage {
        Stage::Choosing => "type 1 or 2 to pick an article",
        Stage::Reading => "type 'done' when you have finished reading",
        Stage::Preguessing => "type 'start' to start guessing",
        Stage::Guessing => "type 1 or 2 to guess which article was read",
        Stage::Recap => "type 'next' for the next round or 'stop' to stop playing",
    }
}
