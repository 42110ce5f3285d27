//! End-to-end study sessions through the public API.
//!
//! | Mode       | Scenario                                   | Award |
//! |------------|--------------------------------------------|-------|
//! | Learn      | 4 questions, all correct in order          | 30    |
//! | Match      | 3 pairs, one miss then 3 straight matches  | 85    |
//! | Flashcards | 7 cards flipped once inside a minute       | 16    |
//! | Test       | 3 of 4 correct                             | 48    |

use chrono::Utc;
use studyloop_core::storage::{LearnConfig, MatchConfig};
use studyloop_core::{
    ActiveMode, Config, Database, Event, FlashcardDeck, LearnPhase, LearnSession, MatchGame,
    MatchPhase, MemoryStore, QuestionItem, QuestionSet, RewardLedger, Role, SelectOutcome,
    StudyMode, StudySession,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn questions(n: usize) -> Vec<QuestionItem> {
    (0..n)
        .map(|k| {
            QuestionItem::new(
                format!("Question {k}?"),
                "C",
                vec![
                    format!("nope {k}"),
                    format!("no {k}"),
                    format!("yes {k}"),
                    format!("never {k}"),
                ],
                format!("Explained {k}."),
            )
        })
        .collect()
}

fn tile(game: &MatchGame, role: Role, pair_key: usize) -> studyloop_core::MatchItemId {
    game.items()
        .iter()
        .find(|i| i.role == role && i.pair_key == pair_key)
        .map(|i| i.id.clone())
        .unwrap()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn learn_all_correct_earns_thirty() {
    let now = Utc::now();
    let mut session = LearnSession::start_at(&questions(4), LearnConfig::default(), Some(9), now);

    for step in 0..4 {
        assert_eq!(session.current_index(), step);
        let right = session.current().unwrap().item.correct_option().unwrap().to_string();
        assert!(session.options().contains(&right));
        let outcome = session.submit_answer_at(&right, now).unwrap();
        assert!(outcome.correct);
        let phase = session.advance_at(now).unwrap();
        if step < 3 {
            assert_eq!(phase, LearnPhase::Answering);
        } else {
            assert_eq!(phase, LearnPhase::Completed);
        }
    }

    let stats = session.stats();
    assert_eq!((stats.correct, stats.streak), (4, 4));
    assert_eq!(session.take_reward(), Some(30));
    assert_eq!(session.take_reward(), None);
}

#[test]
fn match_three_pairs_after_one_miss() {
    let mut game = MatchGame::with_config(&questions(3), MatchConfig::default(), Some(4));

    let q0 = tile(&game, Role::Question, 0);
    let a1 = tile(&game, Role::Answer, 1);
    game.select_item(&q0);
    assert_eq!(
        game.select_item(&a1),
        SelectOutcome::Mismatched { hearts: 2, lost: false }
    );
    assert_eq!(game.streak(), 0);
    game.settle_mistakes();

    let mut celebrations = 0;
    for k in 0..3 {
        let (question, answer) = (tile(&game, Role::Question, k), tile(&game, Role::Answer, k));
        game.select_item(&question);
        match game.select_item(&answer) {
            SelectOutcome::Matched { celebrate, .. } => celebrations += u32::from(celebrate),
            other => panic!("expected a match, got {other:?}"),
        }
    }

    assert_eq!(game.matched_pairs(), 3);
    assert_eq!(game.phase(), MatchPhase::Won);
    assert_eq!(game.streak(), 3);
    assert_eq!(celebrations, 1);
    assert_eq!(game.celebrations(), 1);
    // 20 + 50 + 5 + 2*5
    assert_eq!(game.take_reward(), Some(85));
}

#[test]
fn flashcards_flip_each_card_once() {
    let mut deck = FlashcardDeck::new(&questions(7));
    for card in 0..7 {
        for _ in 0..8 {
            deck.tick();
        }
        assert_eq!(deck.flip(), Some(true));
        if card < 6 {
            deck.next();
        }
    }
    assert!(deck.elapsed_secs() < 60);
    // 5 + 0 + 10 + floor(7/5)
    assert_eq!(deck.take_reward(), Some(16));
}

#[test]
fn test_mode_through_the_controller() {
    let store = MemoryStore::new();
    let mut session =
        StudySession::new(questions(4), RewardLedger::open(&store), Config::default());
    session.enter(StudyMode::Test);

    let Some(ActiveMode::Test(test)) = session.active_mut() else {
        panic!("test mode expected");
    };
    test.choose(0, "yes 0");
    test.choose(1, "yes 1");
    test.choose(2, "yes 2");
    test.choose(3, "no 3");
    let report = test.submit().clone();
    assert_eq!(report.percentage, 75);
    assert_eq!(report.message, "Good effort! You're on the right track.");

    let event = session.collect_reward().unwrap();
    assert!(matches!(
        event,
        Some(Event::XpAwarded { mode: StudyMode::Test, amount: 48, total_xp: 48, .. })
    ));
}

#[test]
fn xp_accumulates_across_sessions_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studyloop.db");

    for _ in 0..2 {
        let ledger = RewardLedger::open(Database::open_at(&path).unwrap());
        let mut session = StudySession::new(questions(1), ledger, Config::default());
        session.enter(StudyMode::Flashcards);
        if let Some(ActiveMode::Flashcards(deck)) = session.active_mut() {
            deck.flip();
        }
        session.back();
    }

    let ledger = RewardLedger::open(Database::open_at(&path).unwrap());
    assert_eq!(ledger.total_xp(), 30);
}

#[test]
fn empty_question_list_is_playable_everywhere() {
    let store = MemoryStore::new();
    let mut session = StudySession::new(Vec::new(), RewardLedger::open(&store), Config::default());
    for mode in StudyMode::ALL {
        session.enter(mode);
        session.tick();
        assert!(session.collect_reward().unwrap().is_none());
    }
    assert_eq!(session.total_xp(), 0);
}

#[test]
fn question_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("questions.json");
    std::fs::write(
        &path,
        r#"[
            {"question": "2 + 2?", "answer": "B", "options": ["3", "4", "5", "6"], "explanation": "Arithmetic."},
            {"question": "Sky colour?", "answer": "blue", "options": ["red", "green"]}
        ]"#,
    )
    .unwrap();

    let set = QuestionSet::load(&path).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.items[0].correct_option(), Some("4"));
    let problems = set.validate();
    assert_eq!(problems.len(), 1);
}
