use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use permgate_core::{Identity, InMemoryDirectory, PermissionEvaluator, Role, User};
use std::hint::black_box;

const TARGET: &str = "6f1c2d3e-8a9b-4c5d-9e0f-1a2b3c4d5e6f";

#[derive(Debug, Clone, Copy)]
struct ScenarioSpec {
    name: &'static str,
    roles: usize,
    permissions_per_role: usize,
    required: usize,
    deny: bool,
}

struct Scenario {
    name: &'static str,
    evaluator: PermissionEvaluator,
    expression: String,
}

fn build_scenario(spec: ScenarioSpec) -> Scenario {
    let roles = (0..spec.roles)
        .map(|r| {
            Role::new(
                format!("role_{r}"),
                (0..spec.permissions_per_role).map(|p| format!("perm_{r}_{p}")),
            )
        })
        .collect();
    let identity: Identity = TARGET.parse().expect("benchmark identity is a uuid");
    let evaluator =
        PermissionEvaluator::new(InMemoryDirectory::from_users([User::new(identity, roles)]));

    // The held permission, when present, is listed last so every token is checked.
    let mut tokens: Vec<String> = (0..spec.required)
        .map(|i| format!("'missing_{i}'"))
        .collect();
    if !spec.deny {
        tokens.push("'perm_0_0'".to_string());
    }
    let expression = format!("{{'permissions', {}}}", tokens.join(", "));

    Scenario {
        name: spec.name,
        evaluator,
        expression,
    }
}

fn specs() -> Vec<ScenarioSpec> {
    let spec = |name, roles, permissions_per_role, required, deny| ScenarioSpec {
        name,
        roles,
        permissions_per_role,
        required,
        deny,
    };
    vec![
        spec("small_allow", 1, 4, 1, false),
        spec("small_deny", 1, 4, 1, true),
        spec("wide_allow", 20, 50, 20, false),
        spec("wide_deny", 20, 50, 20, true),
    ]
}

fn benchmark_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    group.sample_size(40);

    let scenarios: Vec<_> = specs().into_iter().map(build_scenario).collect();

    for scenario in &scenarios {
        group.bench_with_input(BenchmarkId::from_parameter(scenario.name), scenario, |b, s| {
            b.iter(|| {
                black_box(
                    s.evaluator
                        .has_permission(Some(black_box(TARGET)), Some(black_box(s.expression.as_str()))),
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_evaluate);
criterion_main!(benches);
