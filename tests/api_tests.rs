// tests/api_tests.rs

mod common;

use common::{admin_token, learner_token, spawn_app};

#[tokio::test]
async fn unknown_path_is_404() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/random_path_that_does_not_exist"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn lesson_is_served_with_glossary_markers() {
    let app = spawn_app().await;
    let reps_id = app
        .create_term("REPS", "Real Estate Professional Status")
        .await;
    app.create_term("AGI", "Adjusted Gross Income").await;
    let course_id = app.create_course().await;
    app.create_lesson(
        course_id,
        1,
        "Learn about **REPS** and more about **reps** status. **Unknown** stays.",
    )
    .await;

    let lesson: serde_json::Value = app
        .client
        .get(app.url(&format!("/api/courses/{}/lessons/1", course_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let spans = lesson["annotated"]["spans"].as_array().unwrap();
    let markers: Vec<&serde_json::Value> = spans.iter().filter(|s| s["kind"] != "text").collect();

    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0]["kind"], "primary");
    assert_eq!(markers[0]["term_id"], reps_id);
    assert_eq!(markers[0]["anchor"], "glossary-reps");
    assert_eq!(markers[1]["kind"], "repeat");
    assert_eq!(markers[1]["anchor"], "glossary-reps");
    assert_eq!(markers[1]["text"], "reps");
    assert_eq!(spans.last().unwrap()["text"], " status. **Unknown** stays.");
    assert_eq!(lesson["order_index"], 1);
}

#[tokio::test]
async fn course_listing_and_missing_course() {
    let app = spawn_app().await;
    let course_id = app.create_course().await;
    app.create_lesson(course_id, 2, "Second").await;
    app.create_lesson(course_id, 1, "First").await;

    let courses: Vec<serde_json::Value> = app
        .client
        .get(app.url("/api/courses"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["total_lessons"], 2);

    let filtered: Vec<serde_json::Value> = app
        .client
        .get(app.url("/api/courses?course_type=primer"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(filtered.is_empty());

    let course: serde_json::Value = app
        .client
        .get(app.url(&format!("/api/courses/{}", course_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(course["title"], "W-2 Escape Plan");
    assert_eq!(course["lessons"][0]["content"], "First");

    let missing = app
        .client
        .get(app.url("/api/courses/9999"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn glossary_view_is_credited_once() {
    let app = spawn_app().await;
    let term_id = app.create_term("AGI", "Adjusted Gross Income").await;
    let course_id = app.create_course().await;
    app.create_lesson(course_id, 1, "Your **AGI** matters").await;
    let (_, token) = learner_token();

    let credit = |lesson_index: i64| {
        app.client
            .post(app.url("/api/progress/glossary-views"))
            .bearer_auth(&token)
            .json(&serde_json::json!({
                "term_id": term_id,
                "course_id": course_id,
                "lesson_index": lesson_index
            }))
            .send()
    };

    let first: serde_json::Value = credit(1).await.unwrap().json().await.unwrap();
    assert_eq!(first["awarded"], true);
    assert_eq!(first["xp"], 5);

    let second: serde_json::Value = credit(1).await.unwrap().json().await.unwrap();
    assert_eq!(second["awarded"], false);
    assert_eq!(second["xp"], 5);
    assert_eq!(second["credited_count"], 1);

    let missing_lesson = credit(7).await.unwrap();
    assert_eq!(missing_lesson.status().as_u16(), 404);

    let progress: serde_json::Value = app
        .client
        .get(app.url("/api/progress"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(progress["xp"], 5);
    assert_eq!(
        progress["credited_keys"],
        serde_json::json!([format!("{}_{}_1", term_id, course_id)])
    );
}

#[tokio::test]
async fn progress_is_per_learner() {
    let app = spawn_app().await;
    let term_id = app.create_term("AGI", "Adjusted Gross Income").await;
    let course_id = app.create_course().await;
    app.create_lesson(course_id, 1, "Your **AGI** matters").await;

    let (_, token_a) = learner_token();
    let (_, token_b) = learner_token();

    for token in [&token_a, &token_b] {
        let body: serde_json::Value = app
            .client
            .post(app.url("/api/progress/glossary-views"))
            .bearer_auth(token)
            .json(&serde_json::json!({
                "term_id": term_id,
                "course_id": course_id,
                "lesson_index": 1
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["awarded"], true);
        assert_eq!(body["xp"], 5);
    }
}

#[tokio::test]
async fn corrupted_progress_rows_read_as_empty() {
    let app = spawn_app().await;
    let (learner, token) = learner_token();

    for (name, value) in [("glossaryXP", "abc"), ("viewedGlossaryTerms", "[not json")] {
        sqlx::query("INSERT INTO learner_progress (learner_id, name, value) VALUES (?, ?, ?)")
            .bind(&learner)
            .bind(name)
            .bind(value)
            .execute(&app.pool)
            .await
            .unwrap();
    }

    let response = app
        .client
        .get(app.url("/api/progress"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let progress: serde_json::Value = response.json().await.unwrap();
    assert_eq!(progress["xp"], 0);
    assert_eq!(progress["credited_keys"], serde_json::json!([]));
}

#[tokio::test]
async fn protected_routes_check_token_and_role() {
    let app = spawn_app().await;
    let (_, learner) = learner_token();

    let anonymous = app.client.get(app.url("/api/progress")).send().await.unwrap();
    assert_eq!(anonymous.status().as_u16(), 401);

    let bad_token = app
        .client
        .get(app.url("/api/progress"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(bad_token.status().as_u16(), 401);

    let forbidden = app
        .client
        .post(app.url("/api/admin/glossary"))
        .bearer_auth(&learner)
        .json(&serde_json::json!({
            "term": "AGI",
            "definition": "Adjusted Gross Income",
            "category": "Tax Terms"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(forbidden.status().as_u16(), 403);
}

#[tokio::test]
async fn quiz_listing_and_grading() {
    let app = spawn_app().await;
    let course_id = app.create_course().await;
    let question_id = app
        .admin_create(
            "/api/admin/quiz",
            serde_json::json!({
                "course_id": course_id,
                "module_id": 1,
                "question": "What is the first step when you receive an IRS notice?",
                "question_type": "multiple_choice",
                "options": ["Ignore it", "Read it carefully"],
                "correct_answer": "Read it carefully",
                "explanation": "Always read IRS notices carefully."
            }),
        )
        .await;
    app.admin_create(
        "/api/admin/quiz",
        serde_json::json!({
            "course_id": course_id,
            "module_id": 2,
            "question": "Payment plans require a setup fee.",
            "question_type": "true_false",
            "options": ["True", "False"],
            "correct_answer": "True",
            "points": 20
        }),
    )
    .await;

    let module_one: Vec<serde_json::Value> = app
        .client
        .get(app.url(&format!("/api/courses/{}/quiz?module_id=1", course_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(module_one.len(), 1);
    assert_eq!(module_one[0]["points"], 10);

    let submit = |answer: &str| {
        app.client
            .post(app.url("/api/quiz/submit"))
            .query(&[
                ("course_id", course_id.to_string()),
                ("question_id", question_id.to_string()),
                ("answer", answer.to_string()),
            ])
            .send()
    };

    let right: serde_json::Value = submit("read it carefully").await.unwrap().json().await.unwrap();
    assert_eq!(right["correct"], true);
    assert_eq!(right["points"], 10);

    let wrong: serde_json::Value = submit("Ignore it").await.unwrap().json().await.unwrap();
    assert_eq!(wrong["correct"], false);
    assert_eq!(wrong["points"], 0);
    assert_eq!(wrong["explanation"], "Always read IRS notices carefully.");

    let unknown = app
        .client
        .post(app.url("/api/quiz/submit"))
        .query(&[("course_id", "1"), ("question_id", "999"), ("answer", "x")])
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status().as_u16(), 404);
}

#[tokio::test]
async fn quiz_answer_must_be_an_option() {
    let app = spawn_app().await;
    let course_id = app.create_course().await;

    let response = app
        .client
        .post(app.url("/api/admin/quiz"))
        .bearer_auth(admin_token())
        .json(&serde_json::json!({
            "course_id": course_id,
            "module_id": 1,
            "question": "Pick one",
            "question_type": "multiple_choice",
            "options": ["A", "B"],
            "correct_answer": "C"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn glossary_terms_are_unique_ignoring_case() {
    let app = spawn_app().await;
    app.create_term("AGI", "Adjusted Gross Income").await;

    let duplicate = app
        .client
        .post(app.url("/api/admin/glossary"))
        .bearer_auth(admin_token())
        .json(&serde_json::json!({
            "term": "agi",
            "definition": "Again",
            "category": "Tax Terms"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status().as_u16(), 409);
}

#[tokio::test]
async fn glossary_search_and_annotate() {
    let app = spawn_app().await;
    app.create_term("Offer in Compromise", "Settles your <b>tax debt</b><script>x()</script> for less")
        .await;
    app.create_term("AGI", "Adjusted Gross Income").await;

    let all: Vec<serde_json::Value> = app
        .client
        .get(app.url("/api/glossary"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert!(!all[0]["definition"].as_str().unwrap().contains("<script>"));

    let found: Vec<serde_json::Value> = app
        .client
        .get(app.url("/api/glossary/search?q=gross"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["term"], "AGI");

    let annotated: serde_json::Value = app
        .client
        .post(app.url("/api/glossary/annotate"))
        .json(&serde_json::json!({"content": "**agi** and **AGI**"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(annotated["spans"][0]["kind"], "primary");
    assert_eq!(annotated["spans"][0]["term"], "AGI");
    assert_eq!(annotated["spans"][2]["kind"], "repeat");
    let html = annotated["html"].as_str().unwrap();
    assert!(html.contains(r#"id="glossary-agi""#));
    assert!(html.contains(r#"class="glossary-repeat""#));
}

#[tokio::test]
async fn duplicate_lesson_index_conflicts() {
    let app = spawn_app().await;
    let course_id = app.create_course().await;
    app.create_lesson(course_id, 1, "First").await;

    let response = app
        .client
        .post(app.url(&format!("/api/admin/courses/{}/lessons", course_id)))
        .bearer_auth(admin_token())
        .json(&serde_json::json!({
            "title": "Again",
            "description": "Again",
            "content": "Again",
            "duration_minutes": 10,
            "order_index": 1
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn concurrent_glossary_views_keep_every_credit() {
    let app = spawn_app().await;
    let course_id = app.create_course().await;
    app.create_lesson(course_id, 1, "A lesson full of terms").await;

    let mut term_ids = Vec::new();
    for name in ["AGI", "Basis", "CPA", "QOF", "REPS", "STR", "MAGI", "FICA"] {
        term_ids.push(app.create_term(name, "Definition").await);
    }
    let (_, token) = learner_token();

    let mut handles = Vec::new();
    for term_id in term_ids.clone() {
        let client = app.client.clone();
        let url = app.url("/api/progress/glossary-views");
        let token = token.clone();
        handles.push(tokio::spawn(async move {
            client
                .post(url)
                .bearer_auth(token)
                .json(&serde_json::json!({
                    "term_id": term_id,
                    "course_id": course_id,
                    "lesson_index": 1
                }))
                .send()
                .await
                .unwrap()
                .json::<serde_json::Value>()
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        let body = handle.await.unwrap();
        assert_eq!(body["awarded"], true);
    }

    let progress: serde_json::Value = app
        .client
        .get(app.url("/api/progress"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(progress["xp"], 40);
    assert_eq!(progress["credited_keys"].as_array().unwrap().len(), 8);

    // Every key survived, so nothing is awarded a second time
    for term_id in term_ids {
        let again: serde_json::Value = app
            .client
            .post(app.url("/api/progress/glossary-views"))
            .bearer_auth(&token)
            .json(&serde_json::json!({
                "term_id": term_id,
                "course_id": course_id,
                "lesson_index": 1
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(again["awarded"], false);
        assert_eq!(again["xp"], 40);
    }
}

#[tokio::test]
async fn tools_catalog_lists_filters_and_404s() {
    let app = spawn_app().await;
    let calculator_id = app
        .admin_create(
            "/api/admin/tools",
            serde_json::json!({
                "name": "Tax Liability Calculator",
                "description": "Estimate tax liability from income and deductions",
                "type": "calculator",
                "icon": "calculator",
                "is_free": true,
                "config": {"fields": ["income", "deductions", "filing_status"]}
            }),
        )
        .await;
    app.admin_create(
        "/api/admin/tools",
        serde_json::json!({
            "name": "Entity Planner",
            "description": "Compare entity structures",
            "type": "planner",
            "icon": "chart"
        }),
    )
    .await;

    let all: serde_json::Value = app
        .client
        .get(app.url("/api/tools"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.as_array().unwrap().len(), 2);

    let calculators: serde_json::Value = app
        .client
        .get(app.url("/api/tools?type=calculator"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(calculators.as_array().unwrap().len(), 1);

    let tool: serde_json::Value = app
        .client
        .get(app.url(&format!("/api/tools/{}", calculator_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tool["type"], "calculator");
    assert_eq!(tool["is_free"], true);
    assert_eq!(tool["config"]["fields"][1], "deductions");

    let missing = app.client.get(app.url("/api/tools/9999")).send().await.unwrap();
    assert_eq!(missing.status().as_u16(), 404);

    let bad_type = app
        .client
        .post(app.url("/api/admin/tools"))
        .bearer_auth(admin_token())
        .json(&serde_json::json!({
            "name": "Mystery",
            "description": "Unknown kind",
            "type": "oracle",
            "icon": "star"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_type.status().as_u16(), 400);
}

#[tokio::test]
async fn lesson_completion_is_recorded_per_learner() {
    let app = spawn_app().await;
    let course_id = app.create_course().await;
    app.create_lesson(course_id, 1, "First lesson").await;
    app.create_lesson(course_id, 2, "Second lesson").await;
    let (_, token) = learner_token();
    let (_, other_token) = learner_token();

    let record = |token: String, lesson_index: i64, completed: bool, score: Option<i64>| {
        app.client
            .post(app.url("/api/progress/lessons"))
            .bearer_auth(token)
            .json(&serde_json::json!({
                "course_id": course_id,
                "lesson_index": lesson_index,
                "completed": completed,
                "score": score
            }))
            .send()
    };

    let started: serde_json::Value = record(token.clone(), 1, false, None)
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(started["completed"], false);
    assert!(started["completed_at"].is_null());

    let finished: serde_json::Value = record(token.clone(), 1, true, Some(80))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(finished["completed"], true);
    assert_eq!(finished["score"], 80);
    assert!(finished["completed_at"].is_string());

    // A later score keeps the first completion time
    let rescored: serde_json::Value = record(token.clone(), 1, true, Some(95))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rescored["score"], 95);
    assert_eq!(rescored["completed_at"], finished["completed_at"]);

    let missing_lesson = record(token.clone(), 9, true, None).await.unwrap();
    assert_eq!(missing_lesson.status().as_u16(), 404);

    record(other_token.clone(), 2, true, None).await.unwrap();

    let mine: serde_json::Value = app
        .client
        .get(app.url(&format!("/api/progress/lessons?course_id={}", course_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["lesson_index"], 1);

    let anonymous = app.client.get(app.url("/api/progress/lessons")).send().await.unwrap();
    assert_eq!(anonymous.status().as_u16(), 401);
}
