use chrono::DateTime;
use gat_exam::{
    AnswerOption, Clock, Difficulty, ExamConfig, ExamResult, ExamSession, MemorySink, OptionId,
    Question, QuestionFilter, QuestionId, ResultsSink, SessionError, SessionStatus, Subject,
    TickOutcome,
};

const LETTERS: [char; 4] = ['a', 'b', 'c', 'd'];

/// Question `n` whose correct option is `q{n}-{LETTERS[n % 4]}`.
fn question(n: usize, difficulty: Difficulty) -> Question {
    let options = LETTERS
        .iter()
        .map(|letter| AnswerOption::new(format!("q{n}-{letter}"), format!("choice {letter}")))
        .collect();
    Question::new(
        format!("q{n}"),
        format!("Question {n}"),
        options,
        correct(n),
        "algebra",
        difficulty,
        Subject::Math,
    )
    .unwrap()
}

fn qid(n: usize) -> QuestionId {
    QuestionId::new(format!("q{n}"))
}

fn correct(n: usize) -> OptionId {
    OptionId::new(format!("q{n}-{}", LETTERS[n % 4]))
}

fn wrong(n: usize) -> OptionId {
    OptionId::new(format!("q{n}-{}", LETTERS[(n + 1) % 4]))
}

fn fixed_clock() -> Clock {
    Clock::fixed(DateTime::from_timestamp(1_700_000_000, 0).unwrap())
}

fn session(count: usize, seconds: u32) -> ExamSession {
    let questions = (1..=count).map(|n| question(n, Difficulty::Easy)).collect();
    ExamSession::new(
        QuestionFilter::new(Subject::Math, Some(Difficulty::Easy)),
        questions,
        &ExamConfig::new(seconds).unwrap(),
        fixed_clock(),
    )
    .unwrap()
}

#[test]
fn test_twenty_questions_with_fourteen_right_score_seventy() {
    let mut session = session(20, 3600);
    for n in 1..=20 {
        let answer = if n <= 14 { correct(n) } else { wrong(n) };
        session.select_answer(&qid(n), &answer).unwrap();
    }

    let result = session.submit();
    assert_eq!(result.total_questions, 20);
    assert_eq!(result.correct_count, 14);
    assert_eq!(result.score, 70);
    assert_eq!(result.answers.len(), 20);
    assert!(result.answers[0].is_correct);
    assert!(!result.answers[19].is_correct);
    assert_eq!(result.answers[19].correct_answer, correct(20));
    assert_eq!(result.answers[19].user_answer, Some(wrong(20)));
    assert_eq!(result.answers[19].question_text, "Question 20");
    assert_eq!(result.subject, Subject::Math);
    assert_eq!(result.difficulty, Some(Difficulty::Easy));
}

#[test]
fn test_easy_exam_submitted_with_time_left() {
    let mut session = session(15, 2700);
    for n in 1..=15 {
        session.select_answer(&qid(n), &correct(n)).unwrap();
        session.next().unwrap();
    }
    while session.remaining_seconds() > 2000 {
        session.tick();
    }

    let result = session.submit();
    assert_eq!(result.total_questions, 15);
    assert_eq!(result.correct_count, 15);
    assert_eq!(result.score, 100);
    assert_eq!(result.time_spent_seconds, 700);
    assert_eq!(result.grade().letter(), 'A');
}

#[test]
fn test_time_expiry_scores_like_manual_submit() {
    let answer = |session: &mut ExamSession| {
        session.select_answer(&qid(1), &correct(1)).unwrap();
        session.select_answer(&qid(2), &wrong(2)).unwrap();
        session.toggle_flag(&qid(3)).unwrap();
    };

    let mut manual = session(4, 30);
    answer(&mut manual);
    let manual_result = manual.submit();

    let mut timed = session(4, 30);
    answer(&mut timed);
    let mut expired = None;
    for _ in 0..30 {
        if let TickOutcome::Expired(result) = timed.tick() {
            assert!(expired.is_none(), "expired twice");
            expired = Some(result);
        }
    }
    let timed_result = expired.expect("countdown never expired");

    assert_eq!(timed.status(), SessionStatus::Submitted);
    assert_eq!(timed_result.time_spent_seconds, 30);
    assert_eq!(manual_result.time_spent_seconds, 0);

    let strip = |result: &ExamResult| {
        (
            result.total_questions,
            result.correct_count,
            result.score,
            result.submitted_at,
            result.answers.clone(),
        )
    };
    assert_eq!(strip(&manual_result), strip(&timed_result));
}

#[test]
fn test_remaining_time_never_increases_and_freezes_after_submit() {
    let mut expiring = session(3, 5);
    let mut last = expiring.remaining_seconds();
    for _ in 0..10 {
        expiring.tick();
        assert!(expiring.remaining_seconds() <= last);
        last = expiring.remaining_seconds();
    }
    assert_eq!(expiring.remaining_seconds(), 0);
    assert!(expiring.is_submitted());

    let mut submitted = session(3, 100);
    submitted.tick();
    submitted.submit();
    for _ in 0..5 {
        assert_eq!(submitted.tick(), TickOutcome::Idle);
    }
    assert_eq!(submitted.remaining_seconds(), 99);
}

#[test]
fn test_double_submit_returns_same_result_without_changes() {
    let mut session = session(5, 120);
    session.select_answer(&qid(2), &correct(2)).unwrap();

    let first = session.submit();
    let second = session.submit();
    assert_eq!(first, second);
    assert_eq!(
        session.select_answer(&qid(3), &correct(3)),
        Err(SessionError::SessionAlreadySubmitted)
    );
    assert_eq!(session.answered_count(), 1);
    assert_eq!(session.submit(), first);
}

#[test]
fn test_current_index_stays_in_bounds() {
    let mut session = session(4, 60);
    let moves: [fn(&mut ExamSession) -> Result<(), SessionError>; 2] =
        [ExamSession::next, ExamSession::previous];

    for step in 0..40 {
        let _ = moves[(step * 7 / 3) % 2](&mut session);
        let _ = session.go_to(step % 6);
        assert!(session.current_index() < session.total_questions());
    }
}

#[test]
fn test_empty_session_is_degenerate_but_safe() {
    let mut session = session(0, 60);
    assert_eq!(session.progress_percentage(), 0);
    assert!(session.go_to(0).is_err());

    let result = session.submit();
    assert_eq!(result.total_questions, 0);
    assert_eq!(result.correct_count, 0);
    assert_eq!(result.score, 0);
}

#[test]
fn test_questions_shown_to_the_taker_carry_no_answer() {
    let session = session(2, 60);
    for view in session.question_views() {
        let rendered = format!("{:?}", view);
        assert!(!rendered.contains("correct"));
        assert_eq!(view.options.len(), 4);
    }
}

#[test]
fn test_sink_receives_each_result_once() {
    let mut sink = MemorySink::new();
    let mut session = session(2, 2);
    session.select_answer(&qid(1), &correct(1)).unwrap();

    for _ in 0..5 {
        if let TickOutcome::Expired(result) = session.tick() {
            sink.record(&result);
        }
    }
    assert_eq!(sink.results().len(), 1);
    assert_eq!(sink.results()[0].score, 50);
}
