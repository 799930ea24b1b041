//! Interactive terminal loop around the session controller.

use std::sync::Arc;

use anyhow::Result;
use game_core::{
    candidate_query, spawn_candidate_fetch, Delivery, Dispatched, FetchTicket, RoundState,
    SessionController, SessionError,
};
use shared::{domain::Stage, error::SetupError, protocol::Action};
use tracing::warn;
use wiki_integration::{DocumentRenderer, DocumentSource};

use crate::{
    commands::{hint, parse_command, Command},
    config::Settings,
    console::Console,
    screen,
};

enum MatchEnd {
    Stopped,
    Quit,
}

enum RoundEnd {
    Next(FetchTicket),
    Stopped,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
enum SetupChoice {
    Retry,
    Stop,
}

enum Loaded {
    Started,
    Failed(SetupError),
    Stopped,
    Quit,
}

pub struct Game {
    settings: Settings,
    source: Arc<dyn DocumentSource>,
    renderer: Arc<dyn DocumentRenderer>,
    session: SessionController,
    console: Console,
}

impl Game {
    pub fn new(
        settings: Settings,
        source: Arc<dyn DocumentSource>,
        renderer: Arc<dyn DocumentRenderer>,
    ) -> Self {
        Self {
            settings,
            source,
            renderer,
            session: SessionController::new(),
            console: Console::new(),
        }
    }

    pub async fn run(mut self, mut preset: Option<(String, String)>) -> Result<()> {
        println!("{}", screen::INTRO);
        loop {
            let names = match preset.take() {
                Some(names) => Some(names),
                None => self.prompt_names().await?,
            };
            let Some((one, two)) = names else {
                return Ok(());
            };

            let ticket = match self.session.start(&one, &two) {
                Ok(ticket) => ticket,
                Err(err) => {
                    println!("{err}");
                    continue;
                }
            };

            if let MatchEnd::Quit = self.play_match(ticket).await? {
                return Ok(());
            }
            println!("Match over. Enter two names to play again, or 'quit'.");
        }
    }

    async fn prompt_names(&mut self) -> Result<Option<(String, String)>> {
        let Some(one) = self.console.prompt("Player one:").await? else {
            return Ok(None);
        };
        if is_quit(&one) {
            return Ok(None);
        }
        let Some(two) = self.console.prompt("Player two:").await? else {
            return Ok(None);
        };
        if is_quit(&two) {
            return Ok(None);
        }
        Ok(Some((one, two)))
    }

    async fn play_match(&mut self, mut ticket: FetchTicket) -> Result<MatchEnd> {
        loop {
            match self.load_round(ticket).await? {
                Loaded::Started => {}
                Loaded::Stopped => return Ok(MatchEnd::Stopped),
                Loaded::Quit => return Ok(MatchEnd::Quit),
                Loaded::Failed(err) => {
                    println!("Error: {err}");
                    match self.prompt_after_failure().await? {
                        Some(SetupChoice::Retry) => {
                            ticket = self.session.retry_setup()?;
                            continue;
                        }
                        Some(SetupChoice::Stop) => {
                            self.session.stop();
                            return Ok(MatchEnd::Stopped);
                        }
                        None => {
                            self.session.stop();
                            return Ok(MatchEnd::Quit);
                        }
                    }
                }
            }

            match self.play_round().await? {
                RoundEnd::Next(next) => ticket = next,
                RoundEnd::Stopped => return Ok(MatchEnd::Stopped),
                RoundEnd::Quit => return Ok(MatchEnd::Quit),
            }
        }
    }

    /// Asks until the answer is `retry` or `stop`. `None` means quit.
    async fn prompt_after_failure(&mut self) -> Result<Option<SetupChoice>> {
        loop {
            let Some(line) = self
                .console
                .prompt("Type 'retry' to fetch new articles or 'stop' to stop playing:")
                .await?
            else {
                return Ok(None);
            };
            if is_quit(&line) {
                return Ok(None);
            }
            match parse_setup_choice(&line) {
                Some(choice) => return Ok(Some(choice)),
                None => println!("unknown answer '{line}'"),
            }
        }
    }

    /// Waits for candidates while still listening for `stop`.
    async fn load_round(&mut self, ticket: FetchTicket) -> Result<Loaded> {
        println!("loading…");
        let query = candidate_query(
            ticket,
            &self.settings.language,
            self.settings.min_content_length,
        );
        let wait = spawn_candidate_fetch(Arc::clone(&self.source), query, ticket).wait();
        tokio::pin!(wait);

        loop {
            tokio::select! {
                (ticket, result) = &mut wait => {
                    return match self.session.deliver_candidates(ticket, result) {
                        Ok(Delivery::RoundStarted { .. }) => Ok(Loaded::Started),
                        Ok(Delivery::Discarded) => {
                            warn!(token = ticket.token.0, "fetch: result no longer current");
                            Ok(Loaded::Stopped)
                        }
                        Err(SessionError::Setup(err)) => Ok(Loaded::Failed(err)),
                        Err(err) => Err(err.into()),
                    };
                }
                line = self.console.read_line() => {
                    match line? {
                        None => {
                            self.session.stop();
                            return Ok(Loaded::Quit);
                        }
                        Some(line) if is_quit(&line) => {
                            self.session.stop();
                            return Ok(Loaded::Quit);
                        }
                        Some(line) if line.eq_ignore_ascii_case("stop") => {
                            self.session.dispatch(Action::Stop)?;
                            return Ok(Loaded::Stopped);
                        }
                        Some(_) => println!("still loading… type 'stop' to stop playing"),
                    }
                }
            }
        }
    }

    async fn play_round(&mut self) -> Result<RoundEnd> {
        let mut shown: Option<Stage> = None;
        loop {
            let Some(engine) = self.session.engine() else {
                return Ok(RoundEnd::Stopped);
            };
            let state = engine.state().clone();
            let candidates = engine.candidates().clone();

            if shown != Some(state.stage) {
                shown = Some(state.stage);
                match state.stage {
                    Stage::Choosing => println!("{}", screen::choosing(&state)),
                    Stage::Reading => self.show_article(&state).await,
                    Stage::Preguessing => println!("{}", screen::preguessing(&state)),
                    Stage::Guessing => println!("{}", screen::guessing(&state, &candidates)),
                    Stage::Recap => {
                        let players = self
                            .session
                            .players()
                            .cloned()
                            .unwrap_or_else(|| [state.liar.clone(), state.investigator.clone()]);
                        println!("{}", screen::recap(&state, &candidates, &players));
                    }
                }
            }

            let prompt = format!("[{}] {} >", state.stage, hint(state.stage));
            let Some(line) = self.console.prompt(&prompt).await? else {
                self.session.stop();
                return Ok(RoundEnd::Quit);
            };

            let action = match parse_command(&line, state.stage, &candidates) {
                Command::Dispatch(action) => action,
                Command::Quit => {
                    self.session.stop();
                    return Ok(RoundEnd::Quit);
                }
                Command::Unknown(hint) => {
                    println!("{hint}");
                    continue;
                }
            };

            match self.session.dispatch(action) {
                Ok(Dispatched::Advanced(_)) => {}
                Ok(Dispatched::AwaitingCandidates(ticket)) => return Ok(RoundEnd::Next(ticket)),
                Ok(Dispatched::Stopped) => return Ok(RoundEnd::Stopped),
                Err(SessionError::Transition(err)) => println!("Error: {err}"),
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn show_article(&self, state: &RoundState) {
        let Some(article) = state.chosen_article.as_ref() else {
            return;
        };
        println!("loading…");
        match self
            .renderer
            .render(article, &self.settings.language)
            .await
        {
            Ok(doc) => println!("{}", screen::reading(&doc)),
            Err(err) => {
                warn!(page_id = article.page_id.0, %err, "render: failed to load article");
                println!("Error: {err}\nRead it at {}", article.full_url);
            }
        }
    }
}

fn is_quit(line: &str) -> bool {
    line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit")
}

fn parse_setup_choice(line: &str) -> Option<SetupChoice> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("retry") {
        Some(SetupChoice::Retry)
    } else if line.eq_ignore_ascii_case("stop") {
        Some(SetupChoice::Stop)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_choice_ignores_case() {
        assert_eq!(parse_setup_choice("Retry"), Some(SetupChoice::Retry));
        assert_eq!(parse_setup_choice(" STOP "), Some(SetupChoice::Stop));
    }

    #[test]
    fn typos_are_not_taken_as_stop() {
        assert_eq!(parse_setup_choice("rety"), None);
        assert_eq!(parse_setup_choice(""), None);
    }
}
