#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use apiseq::{plan_document, PlanStatus, PlannerConfig};
use common::fixtures::{self, doc, ids, position, LOGIN_PROFILE, USERS_CRUD};

const MUTUAL: &str = r#"
openapi: 3.0.3
info: { title: Mutual, version: "1" }
paths:
  /accounts:
    post:
      requestBody:
        content:
          application/json:
            schema:
              properties:
                token: { type: string }
      responses:
        "201":
          content:
            application/json:
              schema:
                properties:
                  account_id: { type: string }
  /tokens/{account_id}:
    post:
      responses:
        "201":
          content:
            application/json:
              schema:
                properties:
                  token: { type: string }
  /health:
    get:
      responses: { "200": { description: ok } }
"#;

#[test]
fn test_login_before_profile() {
    let run = fixtures::plan(LOGIN_PROFILE);
    assert!(run.plan.is_acyclic());
    assert_eq!(run.plan.order, ids(&["POST /login", "GET /profile"]));
}

#[test]
fn test_create_before_delete() {
    let run = fixtures::plan(USERS_CRUD);
    assert_eq!(run.plan.order, ids(&["POST /users", "DELETE /users/{id}"]));
}

#[test]
fn test_acyclic_order_respects_every_edge() {
    for spec in [LOGIN_PROFILE, USERS_CRUD] {
        let run = fixtures::plan(spec);
        assert!(run.plan.cycles.is_empty());
        assert_eq!(run.plan.order.len(), run.graph.node_count());
        for edge in run.graph.edges() {
            assert!(
                position(&run, &edge.from) < position(&run, &edge.to),
                "{} should precede {}",
                edge.from,
                edge.to
            );
        }
    }
}

#[test]
fn test_mutual_consumption_is_a_cycle() {
    // the account id reaches /tokens only through its path template
    let run = fixtures::plan(MUTUAL);
    assert!(!run.plan.is_acyclic());
    assert!(run
        .graph
        .has_dependency("POST /accounts", "POST /tokens/{account_id}"));
    assert_eq!(
        run.plan.cycles,
        vec![ids(&["POST /accounts", "POST /tokens/{account_id}"])]
    );

    // best-effort order still lists every operation once
    assert_eq!(
        run.plan.order,
        ids(&["GET /health", "POST /accounts", "POST /tokens/{account_id}"])
    );
}

#[test]
fn test_runs_are_deterministic() {
    let document = doc(MUTUAL);
    let config = PlannerConfig::default();
    let first = plan_document(&document, &config).artifact();
    for _ in 0..5 {
        assert_eq!(plan_document(&document, &config).artifact(), first);
    }
}

#[test]
fn test_cycle_cap_from_config() {
    // three operations that all consume each other's output: 5 simple cycles
    let run_spec = r#"
openapi: 3.0.3
info: { title: Dense, version: "1" }
paths:
  /a:
    post:
      parameters: [{ name: b_out, in: query }, { name: c_out, in: query }]
      responses:
        "200":
          content:
            application/json:
              schema: { properties: { a_out: {} } }
  /b:
    post:
      parameters: [{ name: a_out, in: query }, { name: c_out, in: query }]
      responses:
        "200":
          content:
            application/json:
              schema: { properties: { b_out: {} } }
  /c:
    post:
      parameters: [{ name: a_out, in: query }, { name: b_out, in: query }]
      responses:
        "200":
          content:
            application/json:
              schema: { properties: { c_out: {} } }
"#;
    let document = doc(run_spec);

    let full = plan_document(&document, &PlannerConfig::default());
    assert_eq!(full.plan.cycles.len(), 5);
    assert!(!full.plan.cycles_truncated);
    for cycle in &full.plan.cycles {
        let smallest = cycle.iter().min().unwrap();
        assert_eq!(&cycle[0], smallest, "cycles start at their smallest id");
    }

    let config = PlannerConfig {
        max_reported_cycles: Some(2),
        ..Default::default()
    };
    let capped = plan_document(&document, &config);
    assert_eq!(capped.plan.cycles.len(), 2);
    assert!(capped.plan.cycles_truncated);
    assert_eq!(capped.plan.order, full.plan.order);
    assert_eq!(capped.plan.order, ids(&["POST /a", "POST /b", "POST /c"]));

    let silent = PlannerConfig {
        max_reported_cycles: Some(0),
        ..Default::default()
    };
    let hidden = plan_document(&document, &silent);
    assert!(hidden.plan.cycles.is_empty());
    assert!(hidden.plan.cycles_truncated);
    assert!(!hidden.plan.is_acyclic());
    assert_eq!(hidden.artifact().status, PlanStatus::CycleDetected);
    assert_eq!(hidden.plan.order, full.plan.order);
}
