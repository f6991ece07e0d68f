use vitrine_motion_core::{
    Change, Cue, Ease, MotionEngine, MotionEvent, Position, Prop, PropSet, TargetKey, Timeline,
    TweenSpec, Value,
};

fn fade(target: &str, to: f32, d: f32, ease: &str) -> TweenSpec {
    TweenSpec::to(target, PropSet::new().with(Prop::Opacity, to))
        .duration(d)
        .ease(ease.parse::<Ease>().unwrap())
}

/// Word cycle in the shape of the loading screen: fade out, swap text, fade in.
fn word_cycle(words: &[&str]) -> Timeline {
    let mut tl = Timeline::new().on_complete(Cue::new("cycle/done"));
    for (i, word) in words.iter().enumerate() {
        let at: Position = if i == 0 { "+=0.5" } else { "<0.1" }.parse().unwrap();
        tl.add(fade("dynamic", 0.0, 0.3, "power2.in"), at);
        tl.set(
            "dynamic",
            PropSet::new().with(Prop::Text, *word),
            Position::PrevEnd(0.0),
        );
        tl.add(fade("dynamic", 1.0, 0.5, "power2.out"), Position::default());
        tl.add(fade("dynamic", 0.0, 0.5, "power2.in").delay(0.8), Position::default());
    }
    tl
}

fn texts(changes: &[Change]) -> Vec<String> {
    changes
        .iter()
        .filter_map(|c| match c {
            Change::Style {
                prop: Prop::Text,
                value: Some(Value::Text(t)),
                ..
            } => Some(t.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn word_cycle_shows_every_word_in_order_then_completes_once() {
    let mut engine = MotionEngine::default();
    let tl = word_cycle(&["Precision.", "Heritage.", "Legacy."]);
    let total = tl.duration();
    engine.play(tl);

    let mut seen = Vec::new();
    let mut completions = 0;
    let mut elapsed = 0.0;
    while elapsed < total + 1.0 {
        let out = engine.update(1.0 / 60.0);
        elapsed += 1.0 / 60.0;
        seen.extend(texts(&out.changes));
        completions += out
            .events
            .iter()
            .filter(|e| matches!(e, MotionEvent::TimelineCompleted { cue: Some(c), .. } if c.as_str() == "cycle/done"))
            .count();
    }
    assert_eq!(seen, vec!["Precision.", "Heritage.", "Legacy."]);
    assert_eq!(completions, 1);
    assert_eq!(
        engine.stage().float(&TargetKey::from("dynamic"), Prop::Opacity),
        0.0
    );
}

#[test]
fn one_large_step_reaches_the_same_final_state() {
    let frames = {
        let mut engine = MotionEngine::default();
        engine.play(word_cycle(&["A", "B"]));
        for _ in 0..600 {
            engine.update(1.0 / 60.0);
        }
        engine.stage().style(&TargetKey::from("dynamic"), Prop::Text)
    };
    let jump = {
        let mut engine = MotionEngine::default();
        engine.play(word_cycle(&["A", "B"]));
        engine.update(10.0);
        engine.stage().style(&TargetKey::from("dynamic"), Prop::Text)
    };
    assert_eq!(frames, jump);
    assert_eq!(jump, Value::text("B"));
}

#[test]
fn staggered_reveal_lands_every_target() {
    let mut engine = MotionEngine::default();
    let targets: Vec<TargetKey> = ["s0", "s1", "s2"].into_iter().map(TargetKey::from).collect();
    engine.set(&targets, &PropSet::new().with(Prop::Opacity, 0.0).with(Prop::Y, 50.0));
    engine.tween(
        TweenSpec::to(
            &targets,
            PropSet::new().with(Prop::Opacity, 1.0).with(Prop::Y, 0.0),
        )
        .duration(1.0)
        .stagger(0.2)
        .ease("power3.out".parse().unwrap())
        .on_complete(Cue::new("revealed")),
    );

    let early = engine.update(0.1);
    assert!(early.cues().next().is_none());
    // the last target has not started yet
    assert_eq!(engine.stage().float(&targets[2], Prop::Opacity), 0.0);

    let out = engine.update(2.0);
    assert_eq!(out.cues().map(Cue::as_str).collect::<Vec<_>>(), vec!["revealed"]);
    for t in &targets {
        assert_eq!(engine.stage().float(t, Prop::Opacity), 1.0);
        assert_eq!(engine.stage().float(t, Prop::Y), 0.0);
    }
}

#[test]
fn outputs_serialize_for_hosts() {
    let mut engine = MotionEngine::default();
    engine.set("a", &PropSet::new().with(Prop::Display, "none"));
    let out = engine.drain();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["changes"][0]["kind"], "style");
    assert_eq!(json["changes"][0]["target"], "a");
    assert_eq!(json["changes"][0]["prop"], "display");
}
