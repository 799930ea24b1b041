use super::*;

fn article(id: u64, title: &str) -> Article {
    Article {
        page_id: PageId(id),
        title: title.to_string(),
        length: 20_000,
        full_url: format!("https://en.wikipedia.org/?curid={id}"),
    }
}

fn players() -> (PlayerId, PlayerId) {
    (PlayerId::from("Amy"), PlayerId::from("Bo"))
}

fn candidates() -> CandidateSet {
    CandidateSet::from_articles(vec![article(1, "Basalt"), article(2, "Otter")])
        .expect("two candidates")
}

fn engine() -> RoundEngine {
    let (amy, bo) = players();
    let points = Points::new([&amy, &bo]);
    RoundEngine::new(RoundState::init(amy, bo, points), candidates()).expect("engine")
}

fn engine_at(stage: Stage) -> RoundEngine {
    let mut engine = engine();
    let path = [
        RoundAction::ChooseArticle { page_id: PageId(1) },
        RoundAction::DoneReading,
        RoundAction::StartGuessing,
        RoundAction::Guess { page_id: PageId(1) },
    ];
    for action in path {
        if engine.state().stage == stage {
            break;
        }
        engine.dispatch(action).expect("walk");
    }
    assert_eq!(engine.state().stage, stage);
    engine
}

#[test]
fn stage_strictly_advances_through_a_round() {
    let mut engine = engine();
    let actions = [
        RoundAction::ChooseArticle { page_id: PageId(2) },
        RoundAction::DoneReading,
        RoundAction::StartGuessing,
        RoundAction::Guess { page_id: PageId(1) },
    ];

    let mut previous = engine.state().stage;
    for action in actions {
        let outcome = engine.dispatch(action).expect("legal action");
        let stage = engine.state().stage;
        assert_eq!(outcome, RoundOutcome::Advanced(stage));
        assert_eq!(previous.next(), Some(stage));
        previous = stage;
    }
    assert_eq!(previous, Stage::Recap);
}

#[test]
fn chosen_article_is_absent_only_while_choosing() {
    let engine = engine();
    assert!(engine.state().chosen_article.is_none());

    for stage in [Stage::Reading, Stage::Preguessing, Stage::Guessing, Stage::Recap] {
        let engine = engine_at(stage);
        assert_eq!(
            engine.state().chosen_article.as_ref().map(|a| a.page_id),
            Some(PageId(1))
        );
    }
}

#[test]
fn correct_guess_scores_for_investigator() {
    let mut engine = engine_at(Stage::Guessing);
    engine
        .dispatch(RoundAction::Guess { page_id: PageId(1) })
        .expect("guess");

    let state = engine.state();
    let (amy, bo) = players();
    assert!(state.guess_correct);
    assert_eq!(state.points.get(&bo), 1);
    assert_eq!(state.points.get(&amy), 0);
    assert_eq!(state.winner(), Some(&bo));
}

#[test]
fn wrong_guess_scores_for_liar() {
    let mut engine = engine_at(Stage::Guessing);
    engine
        .dispatch(RoundAction::Guess { page_id: PageId(2) })
        .expect("guess");

    let state = engine.state();
    let (amy, bo) = players();
    assert!(!state.guess_correct);
    assert_eq!(state.points.get(&amy), 1);
    assert_eq!(state.points.get(&bo), 0);
    assert_eq!(state.points.total(), 1);
}

#[test]
fn guess_compares_page_identity_not_title() {
    let (amy, bo) = players();
    let twins = CandidateSet::from_articles(vec![article(10, "Mercury"), article(11, "Mercury")])
        .expect("same title, distinct pages");
    let mut engine =
        RoundEngine::new(RoundState::init(amy.clone(), bo, Points::new([&amy])), twins)
            .expect("engine");
    engine
        .dispatch(RoundAction::ChooseArticle { page_id: PageId(10) })
        .expect("choose");
    engine.dispatch(RoundAction::DoneReading).expect("read");
    engine.dispatch(RoundAction::StartGuessing).expect("start");
    engine
        .dispatch(RoundAction::Guess { page_id: PageId(11) })
        .expect("guess");

    assert!(!engine.state().guess_correct);
    assert_eq!(engine.state().points.get(&amy), 1);
}

#[test]
fn guess_before_guessing_stage_is_rejected_without_changes() {
    for stage in [Stage::Choosing, Stage::Reading, Stage::Preguessing] {
        let mut engine = engine_at(stage);
        let before = engine.state().clone();

        let err = engine
            .dispatch(RoundAction::Guess { page_id: PageId(1) })
            .expect_err("guess must be rejected");

        assert_eq!(
            err,
            TransitionError::InvalidTransition {
                stage,
                action: ActionKind::Guess
            }
        );
        assert_eq!(engine.state(), &before);
    }
}

#[test]
fn every_out_of_stage_action_is_rejected() {
    let all = [
        RoundAction::ChooseArticle { page_id: PageId(1) },
        RoundAction::DoneReading,
        RoundAction::StartGuessing,
        RoundAction::Guess { page_id: PageId(1) },
        RoundAction::NextRound,
    ];
    let legal = [
        (Stage::Choosing, ActionKind::ChooseArticle),
        (Stage::Reading, ActionKind::DoneReading),
        (Stage::Preguessing, ActionKind::StartGuessing),
        (Stage::Guessing, ActionKind::Guess),
        (Stage::Recap, ActionKind::NextRound),
    ];

    for (stage, allowed) in legal {
        for action in all {
            if action.kind() == allowed {
                continue;
            }
            let mut engine = engine_at(stage);
            let before = engine.state().clone();
            let err = engine.dispatch(action).expect_err("out of stage");
            assert_eq!(err.code(), shared::error::ErrorCode::InvalidTransition);
            assert_eq!(engine.state(), &before);
        }
    }
}

#[test]
fn unknown_candidate_is_rejected_as_invalid_payload() {
    let mut engine = engine();
    let err = engine
        .dispatch(RoundAction::ChooseArticle { page_id: PageId(99) })
        .expect_err("not a candidate");
    assert_eq!(
        err,
        TransitionError::UnknownCandidate {
            stage: Stage::Choosing,
            page_id: PageId(99)
        }
    );
    assert_eq!(err.code(), shared::error::ErrorCode::InvalidPayload);
    assert_eq!(engine.state().stage, Stage::Choosing);

    let mut engine = engine_at(Stage::Guessing);
    let before = engine.state().clone();
    engine
        .dispatch(RoundAction::Guess { page_id: PageId(99) })
        .expect_err("not a candidate");
    assert_eq!(engine.state(), &before);
}

#[test]
fn next_round_swaps_roles_and_keeps_points() {
    let mut engine = engine_at(Stage::Recap);
    let recap = engine.state().clone();

    let outcome = engine.dispatch(RoundAction::NextRound).expect("next round");
    let RoundOutcome::NextRound(next) = outcome else {
        panic!("expected next round outcome");
    };

    assert_eq!(next.liar, recap.investigator);
    assert_eq!(next.investigator, recap.liar);
    assert_eq!(next.points, recap.points);
    assert_eq!(next.stage, Stage::Choosing);
    assert!(next.chosen_article.is_none());
    assert!(!next.guess_correct);
    assert_eq!(engine.state(), &recap);
}

#[test]
fn awarding_points_leaves_previous_tally_untouched() {
    let (amy, bo) = players();
    let start = Points::new([&amy, &bo]);
    let after = start.award(&amy);

    assert_eq!(start.get(&amy), 0);
    assert_eq!(after.get(&amy), 1);
    assert_eq!(after.total(), 1);
}

#[test]
fn candidate_set_needs_two_distinct_pages() {
    let err = CandidateSet::from_articles(vec![article(1, "Basalt")]).expect_err("one article");
    assert_eq!(err, SetupError::NotEnoughCandidates { usable: 1 });

    let err = CandidateSet::from_articles(vec![article(1, "Basalt"), article(1, "Basalt")])
        .expect_err("duplicate page");
    assert_eq!(err, SetupError::NotEnoughCandidates { usable: 1 });

    let set = CandidateSet::from_articles(vec![
        article(1, "Basalt"),
        article(1, "Basalt"),
        article(3, "Quartz"),
        article(4, "Mica"),
    ])
    .expect("dedup then take two");
    let ids: Vec<_> = set.iter().map(|a| a.page_id).collect();
    assert_eq!(ids, vec![PageId(1), PageId(3)]);
}

#[test]
fn engine_refuses_a_state_past_choosing() {
    let recap = engine_at(Stage::Recap).state().clone();
    assert!(RoundEngine::new(recap, candidates()).is_err());
}

#[test]
fn engine_refuses_one_player_in_both_roles() {
    let (amy, _) = players();
    let state = RoundState::init(amy.clone(), amy.clone(), Points::new([&amy]));
    let err = RoundEngine::new(state, candidates()).expect_err("same player twice");
    assert_eq!(err, TransitionError::SamePlayer { player: amy });
    assert_eq!(err.code(), shared::error::ErrorCode::DuplicateName);
}

#[test]
fn fresh_points_start_at_zero_for_each_player() {
    let (amy, bo) = players();
    let points = Points::new([&amy, &bo]);
    assert_eq!(points.get(&amy), 0u32);
    assert_eq!(points.get(&bo), 0u32);
    assert_eq!(points.total(), 0);
}
