#![allow(dead_code)]

pub mod temp_files {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::{SystemTime, UNIX_EPOCH};

    // Global counter and lock for thread-safe temporary file creation
    static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);
    static TEMP_LOCK: Mutex<()> = Mutex::new(());

    /// Creates a temporary file with guaranteed unique name
    pub fn create_temp_spec(content: &str, ext: &str) -> PathBuf {
        let _lock = TEMP_LOCK.lock().unwrap();
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::SeqCst);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();

        let path = std::env::temp_dir().join(format!(
            "apiseq_test_{}_{}_{}.{}",
            std::process::id(),
            counter,
            nanos,
            ext
        ));

        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn create_temp_yaml(content: &str) -> PathBuf {
        create_temp_spec(content, "yaml")
    }

    pub fn create_temp_json(content: &str) -> PathBuf {
        create_temp_spec(content, "json")
    }

    /// Cleanup temporary files (best effort)
    pub fn cleanup_temp_files(paths: &[PathBuf]) {
        for path in paths {
            let _ = std::fs::remove_file(path);
        }
    }
}

pub mod fixtures {
    use apiseq::{parse_document, plan_document, PlanRun, PlannerConfig, SpecDocument};

    pub fn doc(yaml: &str) -> SpecDocument {
        parse_document(yaml, true).unwrap()
    }

    /// Plan an inline YAML document with the default configuration.
    pub fn plan(yaml: &str) -> PlanRun {
        plan_document(&doc(yaml), &PlannerConfig::default())
    }

    pub fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Position of `id` in the execution order.
    pub fn position(run: &PlanRun, id: &str) -> usize {
        run.plan
            .order
            .iter()
            .position(|o| o == id)
            .unwrap_or_else(|| panic!("{id} missing from order {:?}", run.plan.order))
    }

    /// Minimal auth API: a login that issues a token and a protected profile read.
    pub const LOGIN_PROFILE: &str = r#"
openapi: 3.0.3
info: { title: Login Demo, version: "1.0" }
security:
  - bearerAuth: []
components:
  securitySchemes:
    bearerAuth:
      type: http
      scheme: bearer
paths:
  /login:
    post:
      operationId: login
      security: []
      requestBody:
        content:
          application/json:
            schema:
              type: object
              properties:
                username: { type: string }
                password: { type: string }
      responses:
        "200":
          description: OK
          content:
            application/json:
              schema:
                type: object
                properties:
                  access_token: { type: string }
  /profile:
    get:
      operationId: getProfile
      responses:
        "200":
          description: OK
          content:
            application/json:
              schema:
                type: object
                properties:
                  email: { type: string }
"#;

    /// CRUD API where creating a user returns the id the delete consumes.
    pub const USERS_CRUD: &str = r#"
openapi: 3.0.3
info: { title: Users, version: "1.0" }
components:
  schemas:
    User:
      type: object
      properties:
        id: { type: string }
        name: { type: string }
paths:
  /users:
    post:
      requestBody:
        content:
          application/json:
            schema:
              type: object
              properties:
                name: { type: string }
      responses:
        "201":
          description: Created
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/User'
  /users/{id}:
    delete:
      parameters:
        - name: id
          in: path
          required: true
          schema: { type: string }
      responses:
        "204":
          description: Deleted
"#;
}
