use super::*;

fn option(id: &str, weights: &[(&str, f64)]) -> AxisOption {
    AxisOption {
        id: id.to_string(),
        text: id.to_string(),
        scores: weights
            .iter()
            .map(|(axis, weight)| (axis.to_string(), *weight))
            .collect(),
    }
}

fn question(id: &str, options: Vec<AxisOption>) -> AxisQuestion {
    AxisQuestion {
        id: id.to_string(),
        text: id.to_string(),
        options,
    }
}

fn profile(id: &str, rule: &str) -> ProfileDefinition {
    ProfileDefinition {
        id: id.to_string(),
        label: id.to_string(),
        rule: rule.to_string(),
        caption: String::new(),
        description: None,
        characteristics: Vec::new(),
        travel_style: None,
        recommended_destinations: Vec::new(),
        travel_tips: Vec::new(),
    }
}

fn step(axis: &str, guard: Option<&str>, profile: &str) -> FallbackStep {
    FallbackStep {
        axis: axis.to_string(),
        guard: guard.map(str::to_string),
        profile: profile.to_string(),
    }
}

fn quiz(profiles: Vec<ProfileDefinition>) -> ProfileQuiz {
    ProfileQuiz {
        id: "mini-travel".to_string(),
        title: "Mini travel".to_string(),
        description: String::new(),
        axes: ["plan", "spont", "city", "nature", "foodie", "active"]
            .into_iter()
            .map(str::to_string)
            .collect(),
        questions: vec![
            question(
                "prep",
                vec![option("a", &[("plan", 2.0)]), option("b", &[("spont", 2.0)])],
            ),
            question(
                "mood",
                vec![option("a", &[("city", 2.0)]), option("b", &[("nature", 2.0)])],
            ),
            question(
                "theme",
                vec![
                    option("a", &[("foodie", 2.0)]),
                    option("b", &[("active", 2.0)]),
                    option("c", &[("foodie", 1.0), ("active", 1.0)]),
                ],
            ),
        ],
        profiles,
        priority: vec![
            "planner".to_string(),
            "foodie".to_string(),
            "explorer".to_string(),
            "wanderer".to_string(),
        ],
        fallback: vec![
            step("plan", Some("plan >= spont"), "planner"),
            step("spont", Some("spont > plan"), "wanderer"),
            step("foodie", None, "foodie"),
            step("active", None, "explorer"),
        ],
        scoring_note: String::new(),
    }
}

fn standard_profiles() -> Vec<ProfileDefinition> {
    vec![
        profile("planner", "plan > spont && city > nature"),
        profile("wanderer", "spont > plan"),
        profile("foodie", "foodie > active"),
        profile("explorer", "active > foodie && nature > city"),
    ]
}

fn answers(pairs: &[(&str, &str)]) -> ProfileAnswers {
    pairs
        .iter()
        .map(|(question, option)| (question.to_string(), option.to_string()))
        .collect()
}

#[test]
fn accumulates_weights_per_axis() {
    let quiz = quiz(standard_profiles());
    let classifier = ProfileClassifier::new(&quiz).expect("quiz has profiles");

    let scores = classifier.accumulate(&answers(&[("prep", "a"), ("mood", "b"), ("theme", "c")]));

    assert_eq!(scores.get("plan"), Some(2.0));
    assert_eq!(scores.get("nature"), Some(2.0));
    assert_eq!(scores.get("foodie"), Some(1.0));
    assert_eq!(scores.get("active"), Some(1.0));
    assert_eq!(scores.get("spont"), Some(0.0));
}

#[test]
fn unknown_options_and_missing_answers_contribute_nothing() {
    let quiz = quiz(standard_profiles());
    let classifier = ProfileClassifier::new(&quiz).expect("quiz has profiles");

    let scores = classifier.accumulate(&answers(&[("prep", "z"), ("ghost", "a")]));

    assert!(scores.iter().all(|(_, value)| value == 0.0));
    assert_eq!(quiz.missing_answers(&answers(&[("prep", "z")])), vec!["prep", "mood", "theme"]);
}

#[test]
fn priority_order_wins_regardless_of_declaration_order() {
    let selection = answers(&[("prep", "a"), ("mood", "a"), ("theme", "a")]);

    let declared = quiz(standard_profiles());
    let mut reversed_profiles = standard_profiles();
    reversed_profiles.reverse();
    let reversed = quiz(reversed_profiles);

    for quiz in [&declared, &reversed] {
        let classification = classify_profile(quiz, &selection).expect("classifies");
        assert_eq!(classification.profile.id, "planner");
        assert_eq!(classification.decision, Decision::Priority);
        assert_eq!(classification.matched.len(), 2);
        assert!(classification.matched.contains(&"foodie"));
    }
}

#[test]
fn first_declared_match_when_priority_names_none() {
    let mut quiz = quiz(standard_profiles());
    quiz.priority = vec!["nobody".to_string()];

    let classification =
        classify_profile(&quiz, &answers(&[("prep", "b"), ("mood", "b"), ("theme", "b")]))
            .expect("classifies");

    assert_eq!(classification.matched, vec!["wanderer", "explorer"]);
    assert_eq!(classification.profile.id, "wanderer");
    assert_eq!(classification.decision, Decision::FirstMatch);
}

#[test]
fn fallback_uses_top_axis_precedence() {
    // plan and city tie at the top; nothing matches.
    let mut quiz = quiz(standard_profiles());
    quiz.profiles[0] = profile("planner", "plan > spont && city > nature + 5");

    let classification =
        classify_profile(&quiz, &answers(&[("prep", "a"), ("mood", "a"), ("theme", "c")]))
            .expect("classifies");

    assert!(classification.matched.is_empty());
    assert_eq!(classification.profile.id, "planner");
    assert_eq!(
        classification.decision,
        Decision::Fallback {
            axis: "plan".to_string()
        }
    );
}

#[test]
fn fallback_skips_steps_whose_guard_fails() {
    let mut quiz = quiz(vec![
        profile("planner", "plan > 10"),
        profile("wanderer", "spont > 10"),
        profile("foodie", "foodie > 10"),
        profile("explorer", "active > 10"),
    ]);
    quiz.fallback[0] = step("city", Some("city > active"), "planner");

    // city and active tie, so the city step's guard fails.
    let classification =
        classify_profile(&quiz, &answers(&[("mood", "a"), ("theme", "b")])).expect("classifies");

    assert_eq!(classification.profile.id, "explorer");
    assert_eq!(
        classification.decision,
        Decision::Fallback {
            axis: "active".to_string()
        }
    );
}

#[test]
fn default_profile_when_no_fallback_step_applies() {
    let quiz = quiz(vec![profile("planner", "plan > 10"), profile("wanderer", "spont > 10")]);

    let classification =
        classify_profile(&quiz, &answers(&[("mood", "b")])).expect("classifies");

    assert_eq!(classification.profile.id, "planner");
    assert_eq!(classification.decision, Decision::Default);
}

#[test]
fn fallback_to_unknown_profile_returns_first_declared() {
    let mut quiz = quiz(vec![profile("planner", "plan > 10"), profile("wanderer", "spont > 10")]);
    quiz.fallback = vec![step("nature", None, "hermit")];

    let classification =
        classify_profile(&quiz, &answers(&[("mood", "b")])).expect("classifies");

    assert_eq!(classification.profile.id, "planner");
    assert_eq!(
        classification.decision,
        Decision::Fallback {
            axis: "nature".to_string()
        }
    );
}

#[test]
fn malformed_rules_never_match() {
    let quiz = quiz(vec![
        profile("planner", "plan >>= spont"),
        profile("wanderer", "roaming > plan"),
        profile("foodie", "foodie >= 0"),
    ]);

    let classification =
        classify_profile(&quiz, &answers(&[("prep", "a"), ("mood", "a"), ("theme", "b")]))
            .expect("classifies");

    assert_eq!(classification.matched, vec!["foodie"]);
    assert_eq!(classification.profile.id, "foodie");
}

#[test]
fn overly_nested_rules_and_guards_fail_closed() {
    let nested = format!("{}plan{} >= 0", "(".repeat(5_000), ")".repeat(5_000));
    let mut quiz = quiz(vec![profile("planner", &nested), profile("foodie", "foodie > 10")]);
    quiz.fallback = vec![step("plan", Some(&nested), "foodie")];

    let classification =
        classify_profile(&quiz, &answers(&[("prep", "a")])).expect("classifies");

    assert!(classification.matched.is_empty());
    assert_eq!(classification.profile.id, "planner");
    assert_eq!(classification.decision, Decision::Default);
}

#[test]
fn options_may_feed_undeclared_axes() {
    let mut quiz = quiz(vec![profile("loner", "solo >= 3"), profile("planner", "plan > 0")]);
    quiz.questions.push(question(
        "company",
        vec![option("a", &[("solo", 3.0)]), option("b", &[("together", 3.0)])],
    ));

    let classification = classify_profile(&quiz, &answers(&[("company", "a")])).expect("classifies");

    assert_eq!(classification.scores.get("solo"), Some(3.0));
    assert_eq!(classification.profile.id, "loner");
}

#[test]
fn classification_is_deterministic() {
    let quiz = quiz(standard_profiles());
    let classifier = ProfileClassifier::new(&quiz).expect("quiz has profiles");
    let selection = answers(&[("prep", "b"), ("mood", "a"), ("theme", "c")]);

    let first = classifier.classify(&selection);
    for _ in 0..10 {
        let again = classifier.classify(&selection);
        assert_eq!(again.profile.id, first.profile.id);
        assert_eq!(again.scores, first.scores);
        assert_eq!(again.decision, first.decision);
    }
}

#[test]
fn reuses_compiled_rules_and_recompiles_mismatched_ones() {
    let quiz = quiz(standard_profiles());
    let rules = CompiledRules::compile(&quiz);
    assert_eq!(rules.malformed(), 0);
    let selection = answers(&[("prep", "a"), ("mood", "a"), ("theme", "a")]);

    let cached = ProfileClassifier::with_rules(&quiz, &rules).expect("quiz has profiles");
    assert_eq!(cached.classify(&selection).profile.id, "planner");

    let mut shorter = quiz.clone();
    shorter.profiles.truncate(1);
    shorter.profiles[0] = profile("drifter", "plan > 0");
    let stale = ProfileClassifier::with_rules(&shorter, &rules).expect("quiz has profiles");
    let classification = stale.classify(&selection);
    assert_eq!(classification.matched, vec!["drifter"]);
    assert_eq!(classification.decision, Decision::FirstMatch);
}

#[test]
fn quiz_without_profiles_is_rejected() {
    let quiz = quiz(Vec::new());
    let err = ProfileClassifier::new(&quiz).err().expect("no profiles");
    assert_eq!(
        err,
        ClassifierError::NoProfiles {
            quiz: "mini-travel".to_string()
        }
    );
}
