//! Interactive study session on stdin.
//!
//! One command per line. `q` leaves the mode, `restart` starts it over.
//! Flashcards and Match run a one-second clock while the mode is in play.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use studyloop_core::{
    ActiveMode, Config, Database, Event, FlashcardDeck, KvStore, LearnPhase, LearnSession,
    MatchGame, QuestionSet, RewardLedger, SelectOutcome, StudyMode, StudySession, TestSession,
    Ticker, TickerGuard,
};

#[derive(Args)]
pub struct PlayArgs {
    /// Study mode: flashcards, learn, match or test
    mode: StudyMode,
    /// JSON file with an array of questions
    file: PathBuf,
    /// Seed the shuffles for a reproducible session
    #[arg(long)]
    seed: Option<u64>,
}

enum Flow {
    Continue,
    Quit,
}

type Clock = Option<(TickerGuard, mpsc::Receiver<u64>)>;

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let set = QuestionSet::load(&args.file)?;
    for problem in set.validate() {
        tracing::warn!(file = %args.file.display(), "{problem}");
    }

    let config = Config::load_or_default();
    let ledger = RewardLedger::open(Database::open()?);
    let mut session = StudySession::new(set.items, ledger, config);
    if let Some(seed) = args.seed {
        session = session.with_seed(seed);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(&mut session, args.mode))
}

async fn drive<S: KvStore>(
    session: &mut StudySession<S>,
    mode: StudyMode,
) -> Result<(), Box<dyn std::error::Error>> {
    log_event(&session.enter(mode));
    println!("{} (q to leave)", mode.info().title);
    render(session);

    let mut clock: Clock = None;
    sync_clock(session, &mut clock);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            Some(_) = next_tick(&mut clock) => {
                session.tick();
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if let Flow::Quit = handle(session, line.trim()).await {
                    break;
                }
                if let Some(event) = session.settle_reward() {
                    announce(&event);
                }
                render(session);
                sync_clock(session, &mut clock);
            }
        }
    }

    drop(clock);
    if let Some(event) = session.back() {
        log_event(&event);
    }
    println!("total xp: {}", session.total_xp());
    Ok(())
}

// ── Clock ────────────────────────────────────────────────────────────

/// Keep a one-second ticker alive exactly while a timed mode is still in play.
/// Each tick adds one second to the mode's clock.
fn sync_clock<S: KvStore>(session: &StudySession<S>, clock: &mut Clock) {
    let wanted = session
        .active()
        .is_some_and(|a| a.is_timed() && !a.is_finished());
    match (wanted, clock.is_some()) {
        (true, false) => *clock = Some(Ticker::every_second()),
        (false, true) => *clock = None,
        _ => {}
    }
}

async fn next_tick(clock: &mut Clock) -> Option<u64> {
    match clock {
        Some((_, ticks)) => ticks.recv().await,
        None => std::future::pending().await,
    }
}

// ── Input ────────────────────────────────────────────────────────────

async fn handle<S: KvStore>(session: &mut StudySession<S>, input: &str) -> Flow {
    match input {
        "q" | "quit" | "back" => return Flow::Quit,
        "restart" => {
            if let Some(event) = session.restart() {
                log_event(&event);
            }
            return Flow::Continue;
        }
        _ => {}
    }

    match session.active_mut() {
        Some(ActiveMode::Flashcards(deck)) => flashcards_input(deck, input),
        Some(ActiveMode::Learn(learn)) => learn_input(learn, input).await,
        Some(ActiveMode::Match(game)) => match_input(game, input).await,
        Some(ActiveMode::Test(test)) => test_input(test, input),
        None => return Flow::Quit,
    }
    Flow::Continue
}

fn flashcards_input(deck: &mut FlashcardDeck, input: &str) {
    let handled = match input {
        "f" | "" => deck.flip().is_some(),
        "n" => deck.next().is_some(),
        "p" => deck.previous().is_some(),
        "e" => deck.toggle_explanation().is_some(),
        "r" => {
            deck.reset();
            true
        }
        _ => false,
    };
    if !handled {
        println!("f flip, n next, p previous, e explanation, r first card");
    }
}

async fn learn_input(learn: &mut LearnSession, input: &str) {
    match learn.phase() {
        LearnPhase::Answering => {
            let choice = parse_choice(input).and_then(|i| learn.options().get(i).cloned());
            let Some(choice) = choice else {
                println!("pick an option by number");
                return;
            };
            if let Some(outcome) = learn.submit_answer(&choice) {
                if outcome.correct {
                    println!("correct");
                } else {
                    let right = outcome.correct_option.as_deref().unwrap_or("?");
                    println!("wrong, the answer is: {right}");
                }
                tokio::time::sleep(Duration::from_millis(learn.explanation_delay_ms())).await;
                if learn.reveal_explanation() {
                    if let Some(record) = learn.current() {
                        if record.item.has_explanation() {
                            println!("  {}", record.item.explanation);
                        }
                    }
                }
            }
        }
        LearnPhase::Answered => {
            learn.advance();
        }
        LearnPhase::Completed | LearnPhase::Empty => {}
    }
}

async fn match_input(game: &mut MatchGame, input: &str) {
    let Some(id) = parse_choice(input).and_then(|i| game.items().get(i).map(|t| t.id.clone())) else {
        println!("pick a tile by number");
        return;
    };
    match game.select_item(&id) {
        SelectOutcome::Matched { celebrate, .. } => {
            if celebrate {
                println!("streak {}!", game.streak());
            }
        }
        SelectOutcome::Mismatched { hearts, .. } => {
            println!("no match, {hearts} hearts left");
            tokio::time::sleep(Duration::from_millis(game.mistake_delay_ms())).await;
            game.settle_mistakes();
        }
        SelectOutcome::Toggled { .. } | SelectOutcome::Ignored => {}
    }
}

fn test_input(test: &mut TestSession, input: &str) {
    if input == "submit" {
        test.submit();
        return;
    }
    let mut parts = input.split_whitespace().map(parse_choice);
    let (Some(Some(question)), Some(Some(option))) = (parts.next(), parts.next()) else {
        println!("answer with <question> <option>, then submit");
        return;
    };
    let choice = test
        .questions()
        .get(question)
        .and_then(|q| q.options.get(option))
        .cloned();
    match choice {
        Some(choice) => {
            test.choose(question, &choice);
        }
        None => println!("no such question or option"),
    }
}

/// One-based number typed by the user, as an index.
fn parse_choice(input: &str) -> Option<usize> {
    input.parse::<usize>().ok()?.checked_sub(1)
}

// ── Output ───────────────────────────────────────────────────────────

fn render<S: KvStore>(session: &StudySession<S>) {
    match session.active() {
        Some(ActiveMode::Flashcards(deck)) => render_flashcards(deck),
        Some(ActiveMode::Learn(learn)) => render_learn(learn),
        Some(ActiveMode::Match(game)) => render_match(game),
        Some(ActiveMode::Test(test)) => render_test(test),
        None => {}
    }
}

fn render_flashcards(deck: &FlashcardDeck) {
    let Some(card) = deck.current() else {
        println!("no cards to study");
        return;
    };
    println!(
        "[{}/{}] {}  (viewed {}, {}s)",
        card.index + 1,
        card.total,
        card.front,
        deck.viewed_count(),
        deck.elapsed_secs()
    );
    if let Some(back) = card.back {
        println!("  -> {back}");
    }
    if let Some(explanation) = card.explanation {
        println!("  {explanation}");
    }
    if deck.is_complete() {
        println!("all cards viewed");
    }
}

fn render_learn(learn: &LearnSession) {
    match learn.phase() {
        LearnPhase::Empty => println!("no questions to learn"),
        LearnPhase::Completed => {
            let stats = learn.stats();
            println!(
                "session complete: {} correct, {} incorrect",
                stats.correct, stats.incorrect
            );
        }
        LearnPhase::Answered => println!("press enter to continue"),
        LearnPhase::Answering => {
            let Some(record) = learn.current() else { return };
            println!("{:.0}% {}", learn.progress_pct(), record.item.question);
            for (i, option) in learn.options().iter().enumerate() {
                println!("  {}. {option}", i + 1);
            }
        }
    }
}

fn render_match(game: &MatchGame) {
    if game.items().is_empty() {
        println!("no pairs to match");
        return;
    }
    println!(
        "hearts {}/{}  streak {}  matched {}/{}  {}s",
        game.hearts(),
        game.max_hearts(),
        game.streak(),
        game.matched_pairs(),
        game.total_pairs(),
        game.elapsed_secs()
    );
    for (i, tile) in game.items().iter().enumerate() {
        let mark = if tile.matched {
            "ok"
        } else if tile.wrong {
            "x"
        } else if tile.selected {
            "*"
        } else {
            ""
        };
        println!("  {:>2}. {:<2} {}", i + 1, mark, tile.content);
    }
    if game.phase().is_finished() {
        println!("game over: {:?}", game.phase());
    }
}

fn render_test(test: &TestSession) {
    if let Some(report) = test.report() {
        println!(
            "{}/{} ({}%) {}",
            report.correct, report.total, report.percentage, report.message
        );
        return;
    }
    if test.questions().is_empty() {
        println!("no questions to test");
        return;
    }
    for (i, question) in test.questions().iter().enumerate() {
        println!("{}. {}", i + 1, question.question);
        for (j, option) in question.options.iter().enumerate() {
            let mark = if test.answer(i) == Some(option.as_str()) { "*" } else { " " };
            println!("   {mark}{}. {option}", j + 1);
        }
    }
}

fn announce(event: &Event) {
    if let Event::XpAwarded { amount, total_xp, .. } = event {
        println!("+{amount} XP (total {total_xp})");
    }
    log_event(event);
}

fn log_event(event: &Event) {
    tracing::debug!(event = ?event, "session event");
}
