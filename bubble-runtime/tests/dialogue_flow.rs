//! # 对话流程集成测试
//!
//! 用无头外部能力驱动 DialogueSequencer，验证推进、跳过和回到开头的完整链路。

use bubble_runtime::{
    AdvanceOutcome, BubbleSettings, DialoguePhase, DialogueSequencer, HeadlessBubble,
    LabelMetrics, RuntimeError, Script, ScriptEntry, Speaker, TextLabel,
};

const DT: f32 = 1.0 / 60.0;

struct Stage {
    a: HeadlessBubble,
    b: HeadlessBubble,
    sequencer: DialogueSequencer,
}

fn stage(entries: Vec<ScriptEntry>) -> Stage {
    let a = HeadlessBubble::new(LabelMetrics::default());
    let b = HeadlessBubble::new(LabelMetrics::default());
    let sequencer = DialogueSequencer::new(
        Script::new("test", entries),
        a.build(Speaker::A, BubbleSettings::default()),
        b.build(Speaker::B, BubbleSettings::default()),
    );
    Stage { a, b, sequencer }
}

fn run_until(sequencer: &mut DialogueSequencer, done: impl Fn(&DialogueSequencer) -> bool) {
    let mut frames = 0;
    while !done(sequencer) {
        sequencer.tick(DT);
        frames += 1;
        assert!(frames < 10_000, "序列器没有到达预期状态");
    }
}

fn settle(sequencer: &mut DialogueSequencer) {
    run_until(sequencer, |s| !s.is_animating());
}

fn active_count(sequencer: &DialogueSequencer) -> usize {
    [Speaker::A, Speaker::B]
        .into_iter()
        .filter(|speaker| sequencer.bubble(*speaker).is_active())
        .count()
}

/// 两句对话的完整流程：显示、跳过、切换、跳过、回到开头
#[test]
fn test_two_line_dialogue() {
    let mut stage = stage(vec![
        ScriptEntry::new(Speaker::A, "Hello there"),
        ScriptEntry::new(Speaker::B, "Hi!"),
    ]);
    let s = &mut stage.sequencer;
    let mut outcomes = Vec::new();

    // 1. A 出现并开始逐字显示
    outcomes.push(s.advance());
    run_until(s, |s| s.bubble(Speaker::A).is_revealing());
    assert!(s.bubble(Speaker::A).is_active());
    assert_eq!(s.cursor(), 1);
    assert_eq!(s.phase(), DialoguePhase::Speaking(Speaker::A));

    // 2. 跳过 A 的逐字显示
    outcomes.push(s.advance());
    assert!(!s.bubble(Speaker::A).is_revealing());
    assert_eq!(s.bubble(Speaker::A).rendered_text(), "Hello there");
    assert_eq!(s.cursor(), 1);

    // 3. A 消失，B 出现
    outcomes.push(s.advance());
    run_until(s, |s| s.bubble(Speaker::B).is_revealing());
    assert!(!s.bubble(Speaker::A).is_active());
    assert!(s.bubble(Speaker::B).is_active());
    assert_eq!(s.cursor(), 2);

    // 4. 最后一句也可以跳过
    outcomes.push(s.advance());
    assert!(!s.bubble(Speaker::B).is_revealing());
    assert_eq!(s.bubble(Speaker::B).rendered_text(), "Hi!");
    assert_eq!(s.cursor(), 2);

    // 5. 回到开头
    outcomes.push(s.advance());
    settle(s);
    assert_eq!(s.cursor(), 0);
    assert_eq!(s.phase(), DialoguePhase::Idle);
    assert_eq!(active_count(s), 0);
    assert_eq!(stage.b.label.text(), "");

    insta::assert_debug_snapshot!(outcomes, @r#"
    [
        Committed {
            index: 0,
            speaker: A,
        },
        Skipped {
            index: 0,
        },
        Committed {
            index: 1,
            speaker: B,
        },
        Skipped {
            index: 1,
        },
        Wrapped,
    ]
    "#);
}

/// 每句都等逐字显示结束，len + 1 次推进后回到空闲
#[test]
fn test_full_pass_returns_to_idle() {
    let scripts = vec![
        vec![ScriptEntry::new(Speaker::A, "one")],
        vec![
            ScriptEntry::new(Speaker::A, "one"),
            ScriptEntry::new(Speaker::A, "two"),
            ScriptEntry::new(Speaker::B, "three"),
        ],
        vec![
            ScriptEntry::new(Speaker::B, "你好，世界"),
            ScriptEntry::new(Speaker::A, "a fairly long line that needs to wrap at least once"),
            ScriptEntry::new(Speaker::B, ""),
        ],
    ];

    for entries in scripts {
        let len = entries.len();
        let mut stage = stage(entries);
        let s = &mut stage.sequencer;

        for _ in 0..len {
            assert!(matches!(s.advance(), AdvanceOutcome::Committed { .. }));
            settle(s);
            assert_eq!(active_count(s), 1);
        }
        assert_eq!(s.cursor(), len);

        assert_eq!(s.advance(), AdvanceOutcome::Wrapped);
        settle(s);
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.phase(), DialoguePhase::Idle);
        assert_eq!(active_count(s), 0);
    }
}

/// 回到开头的过渡进行中，推进被忽略
#[test]
fn test_advance_during_wrap_is_ignored() {
    let mut stage = stage(vec![ScriptEntry::new(Speaker::A, "only")]);
    let s = &mut stage.sequencer;
    s.advance();
    settle(s);

    assert_eq!(s.advance(), AdvanceOutcome::Wrapped);
    assert_eq!(s.advance(), AdvanceOutcome::Busy);
    s.tick(DT);
    assert_eq!(s.advance(), AdvanceOutcome::Busy);
    settle(s);
    assert_eq!(s.cursor(), 0);

    // 之后从第一句重新开始
    assert_eq!(
        s.advance(),
        AdvanceOutcome::Committed {
            index: 0,
            speaker: Speaker::A
        }
    );
}

/// 跳过时显示原文，游标不变
#[test]
fn test_skip_mid_reveal() {
    let text = "a fairly long line that needs to wrap at least once";
    let mut stage = stage(vec![ScriptEntry::new(Speaker::A, text)]);
    let s = &mut stage.sequencer;

    s.advance();
    run_until(s, |s| s.bubble(Speaker::A).is_revealing());
    for _ in 0..10 {
        s.tick(DT);
    }
    assert!(s.bubble(Speaker::A).is_revealing());
    assert!(s.bubble(Speaker::A).processed_text().contains('\n'));

    assert_eq!(s.advance(), AdvanceOutcome::Skipped { index: 0 });
    assert!(!s.bubble(Speaker::A).is_revealing());
    assert_eq!(s.bubble(Speaker::A).rendered_text(), text);
    assert_eq!(s.cursor(), 1);

    // 跳过后不再有逐字显示
    s.tick(DT);
    assert_eq!(stage.a.label.text(), text);
}

/// 切换说话者的每一帧都最多只有一个气泡可见
#[test]
fn test_bubbles_never_overlap() {
    let mut stage = stage(vec![
        ScriptEntry::new(Speaker::A, "first"),
        ScriptEntry::new(Speaker::B, "second"),
        ScriptEntry::new(Speaker::A, "third"),
    ]);
    let s = &mut stage.sequencer;

    for _ in 0..4 {
        s.advance();
        let mut frames = 0;
        while s.is_animating() {
            assert!(active_count(s) <= 1);
            s.tick(DT);
            frames += 1;
            assert!(frames < 10_000);
        }
        assert!(active_count(s) <= 1);
    }
    assert_eq!(s.phase(), DialoguePhase::Idle);
}

/// 无效说话者不影响后续推进
#[test]
fn test_invalid_entry_is_reported_and_skipped() {
    let mut stage = stage(vec![
        ScriptEntry::new(Speaker::A, "before"),
        ScriptEntry::new("C", "never shown"),
        ScriptEntry::new(Speaker::B, "after"),
    ]);
    let s = &mut stage.sequencer;

    s.advance();
    settle(s);

    assert_eq!(
        s.advance(),
        AdvanceOutcome::InvalidEntry(RuntimeError::InvalidSpeaker {
            index: 1,
            tag: "C".to_string()
        })
    );
    assert_eq!(s.cursor(), 2);
    assert_eq!(s.bubble(Speaker::A).rendered_text(), "before");
    assert_eq!(s.phase(), DialoguePhase::Speaking(Speaker::A));

    assert!(matches!(
        s.advance(),
        AdvanceOutcome::Committed {
            index: 2,
            speaker: Speaker::B
        }
    ));
    settle(s);
    assert_eq!(stage.b.label.text(), "after");
    assert!(!stage.a.voice.events().is_empty());
}
