use account_admin_server::{
    database::{queries::UserQueries, UserListQuery},
    models::{FetchRequest, Plan, RawFilterClause, User},
    services::{filter, plan_annotator, user_query::UserQueryService},
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

fn clause(key: &str, condition: &str, value: serde_json::Value) -> RawFilterClause {
    RawFilterClause {
        key: Some(key.to_string()),
        condition: Some(condition.to_string()),
        value: Some(value),
    }
}

fn sample_filters(n: usize) -> Vec<RawFilterClause> {
    let templates = [
        clause("email", "=", json!("example")),
        clause("d", ">=", json!("5")),
        clause("transfer_enable", "<", json!(100)),
        clause("expired_at", ">", json!(1700000000)),
        clause("token", "=", json!("abc")),
    ];
    templates.iter().cycle().take(n).cloned().collect()
}

fn sample_user(id: i64, plan_id: Option<i64>) -> User {
    User {
        id,
        email: format!("user{}@example.com", id),
        password: String::new(),
        password_algo: None,
        plan_id,
        group_id: None,
        transfer_enable: 0,
        u: 0,
        d: 0,
        expired_at: None,
        uuid: String::new(),
        token: String::new(),
        banned: false,
        remarks: None,
        speed_limit: None,
        created_at: 0,
        updated_at: 0,
    }
}

fn sample_plan(id: i64) -> Plan {
    Plan {
        id,
        name: format!("plan-{}", id),
        group_id: id,
        transfer_enable: 100,
        created_at: 0,
        updated_at: 0,
    }
}

fn benchmark_filter_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_compile");

    for n in [1usize, 5, 20] {
        group.bench_with_input(BenchmarkId::new("list_query", n), &n, |b, &n| {
            b.iter(|| {
                let request = FetchRequest {
                    filter: sample_filters(n),
                    ..Default::default()
                };
                let query = UserQueryService::list_query(black_box(request)).unwrap();
                black_box(UserQueries::select_builder(&query).sql().len())
            })
        });
    }

    group.bench_function("parse_only", |b| {
        b.iter(|| {
            let clauses = filter::parse_filters(black_box(sample_filters(5))).unwrap();
            let predicates = filter::build_predicates(&clauses).unwrap();
            black_box(UserListQuery {
                predicates,
                ..Default::default()
            })
        })
    });

    group.finish();
}

fn benchmark_plan_annotation(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_annotation");
    let plans: Vec<Plan> = (1..=50).map(sample_plan).collect();

    for rows in [10i64, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("annotate", rows), &rows, |b, &rows| {
            b.iter(|| {
                let users: Vec<User> = (0..rows).map(|i| sample_user(i, Some(i % 60))).collect();
                black_box(plan_annotator::annotate(users, &plans))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_filter_compile, benchmark_plan_annotation);
criterion_main!(benches);
