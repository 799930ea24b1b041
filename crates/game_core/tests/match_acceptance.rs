use game_core::{Delivery, Dispatched, SessionController, SessionError, SessionPhase};
use shared::{
    domain::{Article, PageId, PlayerId, Stage},
    error::SetupError,
    protocol::Action,
};

fn article(id: u64, title: &str) -> Article {
    Article {
        page_id: PageId(id),
        title: title.to_string(),
        length: 30_000,
        full_url: format!("https://en.wikipedia.org/wiki/{title}"),
    }
}

#[test]
fn amy_fools_bo_then_roles_swap() {
    let amy = PlayerId::from("Amy");
    let bo = PlayerId::from("Bo");
    let c1 = article(101, "Fjord");
    let c2 = article(202, "Zeppelin");

    let mut session = SessionController::new();
    let ticket = session.start("Amy", "Bo").expect("start");
    assert_eq!(
        session
            .deliver_candidates(ticket, Ok(vec![c1.clone(), c2.clone()]))
            .expect("deliver"),
        Delivery::RoundStarted { round: 1 }
    );

    let state = session.round_state().expect("state");
    assert_eq!(state.liar, amy);
    assert_eq!(state.investigator, bo);

    assert_eq!(
        session
            .dispatch(Action::ChooseArticle { page_id: c1.page_id })
            .expect("choose"),
        Dispatched::Advanced(Stage::Reading)
    );
    assert_eq!(
        session.dispatch(Action::DoneReading).expect("done reading"),
        Dispatched::Advanced(Stage::Preguessing)
    );
    assert_eq!(
        session.dispatch(Action::StartGuessing).expect("start guessing"),
        Dispatched::Advanced(Stage::Guessing)
    );
    assert_eq!(
        session
            .dispatch(Action::Guess { page_id: c2.page_id })
            .expect("guess"),
        Dispatched::Advanced(Stage::Recap)
    );

    let recap = session.round_state().expect("state");
    assert!(!recap.guess_correct);
    assert_eq!(recap.points.get(&amy), 1);
    assert_eq!(recap.points.get(&bo), 0);
    assert_eq!(recap.stage, Stage::Recap);
    assert_eq!(recap.chosen_article.as_ref(), Some(&c1));
    assert_eq!(recap.winner(), Some(&amy));

    let Dispatched::AwaitingCandidates(_) = session.dispatch(Action::NextRound).expect("next")
    else {
        panic!("next round should wait for new candidates");
    };
    let next = session.round_state().expect("state");
    assert_eq!(next.liar, bo);
    assert_eq!(next.investigator, amy);
    assert_eq!(next.points.get(&amy), 1);
    assert_eq!(next.points.get(&bo), 0);
    assert_eq!(next.stage, Stage::Choosing);
    assert!(next.chosen_article.is_none());
}

#[test]
fn one_usable_candidate_never_reaches_choosing() {
    let mut session = SessionController::new();
    let ticket = session.start("Amy", "Bo").expect("start");

    let err = session
        .deliver_candidates(ticket, Ok(vec![article(1, "Lonely")]))
        .expect_err("setup failure");

    assert!(matches!(
        err,
        SessionError::Setup(SetupError::NotEnoughCandidates { usable: 1 })
    ));
    assert_eq!(session.phase(), SessionPhase::SetupFailed);
    assert!(session.engine().is_none());
    assert!(matches!(
        session.dispatch(Action::ChooseArticle { page_id: PageId(1) }),
        Err(SessionError::RoundNotReady)
    ));
}

#[test]
fn identical_players_never_create_a_round() {
    let mut session = SessionController::new();
    assert!(matches!(
        session.start("Amy", "Amy"),
        Err(SessionError::DuplicatePlayers(_))
    ));
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.round_state().is_none());
    assert!(session.pending_ticket().is_none());
}
