use evolve_catalog::{Evolution, EvolutionError, EvolutionKind};
use evolve_decl::ResolveError;
use evolve_planner::{
    file_seed, EvolutionRules, Evolver, Plan, PlanningError, Planner, PlannerConfig, SourceFile,
};
use evolve_syntax::{make, NodeKind, Position, SyntaxNode};
use evolve_test_utils::{
    file, function, param, protocol, requirement, scenarios, structure, ty, typealias, typed_var,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn plan_with(config: PlannerConfig, source: &SourceFile, seed: u64) -> Result<Plan, PlanningError> {
    Planner::new(config).plan_file(source, &mut StdRng::seed_from_u64(seed))
}

fn plan(source: &SourceFile, seed: u64) -> Plan {
    plan_with(PlannerConfig::default(), source, seed).unwrap()
}

fn kinds(plan: &Plan) -> Vec<EvolutionKind> {
    plan.iter().map(|entry| entry.evolution().kind()).collect()
}

/// Resilient struct followed by a free function with collection parameters
fn mixed_file() -> SourceFile {
    let mut decls = scenarios::resilient_struct().children().to_vec();
    decls.extend(scenarios::collection_function().children().iter().cloned());
    SourceFile::new("mixed.swift", file(decls))
}

#[test]
fn test_resilient_struct_plans_one_evolution_with_prerequisites() {
    let source = SourceFile::new("r.swift", scenarios::resilient_struct());
    for seed in 0..32 {
        let plan = plan(&source, seed);
        match kinds(&plan).as_slice() {
            [EvolutionKind::SynthesizeMemberwiseInitializer] => {}
            [EvolutionKind::SynthesizeMemberwiseInitializer, EvolutionKind::ShuffleMembers] => {
                assert_eq!(plan.entries()[0].path(), plan.entries()[1].path());
            }
            other => panic!("seed {seed}: unexpected plan {other:?}"),
        }
        for entry in &plan {
            assert_eq!(entry.path().to_string(), "0.1");
            assert_eq!(entry.location(), "r.swift@0.1");
        }
    }
}

#[test]
fn test_frozen_struct_only_gains_an_initializer() {
    let source = SourceFile::new("f.swift", scenarios::frozen_struct());
    for seed in 0..32 {
        assert_eq!(
            kinds(&plan(&source, seed)),
            vec![EvolutionKind::SynthesizeMemberwiseInitializer]
        );
    }
}

#[test]
fn test_collection_function_gets_a_literal_default() {
    let source = SourceFile::new("c.swift", scenarios::collection_function());
    for seed in 0..16 {
        let plan = plan(&source, seed);
        assert_eq!(plan.len(), 1);
        let Evolution::ChangeDefaultArgument(change) = plan.entries()[0].evolution() else {
            panic!("expected a default argument change, got {plan:?}");
        };
        let expected = if change.index == 0 { "[]" } else { "[:]" };
        assert_eq!(change.value, expected);
    }
}

#[test]
fn test_protocol_requirements_are_never_planned() {
    let tree = file(vec![protocol("P")
        .member(requirement("f", vec![param("count", "Int")]))
        .member(requirement("g", vec![param("name", "String")]))
        .build()]);
    let source = SourceFile::new("p.swift", tree);
    for seed in 0..16 {
        let plan = plan(&source, seed);
        assert!(
            plan.iter()
                .all(|e| e.evolution().kind() != EvolutionKind::ChangeDefaultArgument),
            "seed {seed}: {plan:?}"
        );
    }
}

#[test]
fn test_inner_scopes_are_planned_before_outer_ones() {
    let method = function("f", vec![param("x", "Int")]).at(Position::new(4, 5));
    let tree = file(vec![structure("S")
        .member(typed_var("a", "Int"))
        .member(method)
        .build()]);
    let source = SourceFile::new("n.swift", tree);

    for seed in 0..16 {
        let plan = plan(&source, seed);
        let first = &plan.entries()[0];
        assert_eq!(first.evolution().kind(), EvolutionKind::ChangeDefaultArgument);
        assert_eq!(first.path().to_string(), "0.1.1");
        assert_eq!(first.location(), "n.swift:4:5");
        assert!(plan.len() == 2 || plan.len() == 3, "seed {seed}: {plan:?}");
    }
}

#[test]
fn test_alias_chain_within_bound_resolves() {
    let source = SourceFile::new("a.swift", scenarios::alias_chain(5));
    let plan = plan(&source, 0);
    let Evolution::ChangeDefaultArgument(change) = plan.entries()[0].evolution() else {
        panic!("expected a default argument change, got {plan:?}");
    };
    assert_eq!(change.value, "0");
}

#[test]
fn test_alias_chain_beyond_bound_aborts_the_file() {
    let source = SourceFile::new("a.swift", scenarios::alias_chain(5));
    let config = PlannerConfig::new().with_max_alias_depth(4);
    let err = plan_with(config, &source, 0).unwrap_err();

    assert_eq!(err.file(), "a.swift");
    let PlanningError::Evolution { source, .. } = err else {
        panic!("expected an evolution failure");
    };
    assert_eq!(
        source,
        EvolutionError::Resolve(ResolveError::AliasDepthExceeded {
            name: "(file).A0".into(),
            depth: 4,
        })
    );
}

#[test]
fn test_cyclic_aliases_terminate() {
    let tree = file(vec![
        typealias("A", ty("B")),
        typealias("B", ty("A")),
        function("f", vec![param("x", "A")]),
    ]);
    let source = SourceFile::new("cycle.swift", tree);
    let err = plan_with(PlannerConfig::default(), &source, 0).unwrap_err();
    assert!(matches!(
        err,
        PlanningError::Evolution {
            source: EvolutionError::Resolve(ResolveError::AliasDepthExceeded { .. }),
            ..
        }
    ));
}

#[test]
fn test_rules_exclude_kinds_per_qualified_name() {
    let source = mixed_file();
    let rules = EvolutionRules::from_yaml_str(
        "ChangeDefaultArgument: ['(file).consume']\nShuffleMembers: []\n",
    )
    .unwrap();
    let config = PlannerConfig::new().with_rules(rules);

    for seed in 0..16 {
        let plan = plan_with(config.clone(), &source, seed).unwrap();
        assert_eq!(
            kinds(&plan),
            vec![EvolutionKind::SynthesizeMemberwiseInitializer],
            "seed {seed}"
        );
    }
}

#[test]
fn test_rules_loaded_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.json");
    std::fs::write(&path, r#"{ "SynthesizeMemberwiseInitializer": null }"#).unwrap();

    let rules = EvolutionRules::load(&path).unwrap();
    let source = SourceFile::new("r.swift", scenarios::resilient_struct());
    for seed in 0..8 {
        // Shuffling needs the excluded initializer, so nothing remains.
        let plan = plan_with(PlannerConfig::new().with_rules(rules.clone()), &source, seed).unwrap();
        assert!(plan.is_empty(), "seed {seed}: {plan:?}");
    }
}

#[test]
fn test_plan_files_isolates_failures() {
    let good = mixed_file();
    let bad = SourceFile::new("bad.swift", make::statement("print(1)"));
    let other = SourceFile::new("c.swift", scenarios::collection_function());
    let planner = Planner::new(PlannerConfig::new().with_seed(99));

    let results = planner.plan_files(&[good.clone(), bad, other.clone()]);
    assert_eq!(results.len(), 3);
    assert!(matches!(results[1], Err(PlanningError::InvalidRoot { kind: NodeKind::Statement, .. })));

    for (result, source) in [(&results[0], &good), (&results[2], &other)] {
        let alone = planner
            .plan_file(source, &mut StdRng::seed_from_u64(file_seed(99, &source.path)))
            .unwrap();
        assert_eq!(result.as_ref().unwrap(), &alone);
    }
}

#[test]
fn test_plan_round_trips_through_a_file_and_replays() {
    let source = mixed_file();
    let plan = plan(&source, 5);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.json");
    std::fs::write(&path, plan.to_json().unwrap()).unwrap();
    let reloaded = Plan::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(reloaded, plan);

    let evolver = Evolver::new();
    let evolved = evolver.apply(&source, &reloaded).unwrap();
    assert_eq!(evolved, evolver.apply(&source, &plan).unwrap());
    assert_ne!(evolved.root, source.root);
}

#[test]
fn test_source_file_loads_from_json() {
    let source = mixed_file();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed.json");
    std::fs::write(&path, serde_json::to_string(&source).unwrap()).unwrap();
    assert_eq!(SourceFile::load(&path).unwrap(), source);

    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(SourceFile::load(&path), Err(PlanningError::Decode { .. })));
    assert!(matches!(
        SourceFile::load(&dir.path().join("missing.json")),
        Err(PlanningError::Io { .. })
    ));
}

/// Evolved member block of the first declaration
fn first_block(root: &SyntaxNode) -> &SyntaxNode {
    root.children()[0].member_block().unwrap()
}

proptest! {
    #[test]
    fn prop_planning_is_deterministic(seed in any::<u64>()) {
        let source = mixed_file();
        let first = plan(&source, seed);
        let second = plan(&source, seed);
        prop_assert_eq!(first.digest().unwrap(), second.digest().unwrap());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_shuffle_always_follows_its_initializer(seed in any::<u64>()) {
        let source = mixed_file();
        let plan = plan(&source, seed);
        for (i, entry) in plan.entries().iter().enumerate() {
            if entry.evolution().kind() == EvolutionKind::ShuffleMembers {
                prop_assert!(i > 0);
                let previous = &plan.entries()[i - 1];
                prop_assert_eq!(
                    previous.evolution().kind(),
                    EvolutionKind::SynthesizeMemberwiseInitializer
                );
                prop_assert_eq!(previous.path(), entry.path());
            }
        }
    }

    #[test]
    fn prop_replay_keeps_every_member(seed in any::<u64>()) {
        let source = SourceFile::new("r.swift", scenarios::resilient_struct());
        let plan = plan(&source, seed);
        let evolved = Evolver::new().apply(&source, &plan).unwrap();

        let block = first_block(&evolved.root);
        // Ten properties plus the synthesized initializer.
        prop_assert_eq!(block.children().len(), 11);
        let mut names: Vec<String> = block
            .children()
            .iter()
            .filter(|m| m.kind() == NodeKind::VariableDecl)
            .filter_map(|m| m.bindings().next().and_then(SyntaxNode::name).map(str::to_string))
            .collect();
        names.sort();
        let mut expected: Vec<String> = (0..10).map(|i| format!("p{i}")).collect();
        expected.sort();
        prop_assert_eq!(names, expected);
    }
}
