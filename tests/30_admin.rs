mod common;

use std::sync::Arc;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{lazy_state, seed_user, spawn_app, spawn_db_app, unique, StubLookup};
use inspection_acts::types::Role;

#[tokio::test]
async fn admin_routes_reject_plain_users_and_anonymous() -> Result<()> {
    let app = spawn_app(lazy_state(Arc::new(StubLookup::default()))?).await?;
    let user = app.session_for(31, Role::User).await;

    for path in ["/users", "/employees", "/api/users"] {
        let resp = app.get(path, &user).send().await?;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{}", path);
        let body: Value = resp.json().await?;
        assert!(body["message"].is_string());

        let resp = app.client.get(app.url(path)).send().await?;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", path);
    }

    let resp = app.delete("/users/1", &user).send().await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn admin_cannot_delete_own_account() -> Result<()> {
    let app = spawn_app(lazy_state(Arc::new(StubLookup::default()))?).await?;
    let admin = app.session_for(32, Role::Admin).await;

    let resp = app.delete("/users/32", &admin).send().await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn create_user_validates_and_hides_password() -> Result<()> {
    let Some(app) = spawn_db_app().await? else {
        return Ok(());
    };
    let admin = app.session_for(33, Role::Admin).await;
    let login = unique("new");

    let resp = app
        .post("/users", &admin)
        .json(&json!({ "name": "  Ольга  ", "login": format!(" {} ", login), "password": " pw ", "role": "root" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await?;
    assert_eq!(created["name"], "Ольга");
    assert_eq!(created["login"], login.as_str());
    assert_eq!(created["role"], "user");
    assert!(created.get("password").is_none());

    let (status, _) = app.login(&login, "pw").await?;
    assert_eq!(status, StatusCode::OK);

    let duplicate = app
        .post("/users", &admin)
        .json(&json!({ "name": "Другая", "login": login, "password": "x" }))
        .send()
        .await?;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let incomplete = app
        .post("/users", &admin)
        .json(&json!({ "name": "Без пароля", "login": unique("np"), "password": "   " }))
        .send()
        .await?;
    assert_eq!(incomplete.status(), StatusCode::BAD_REQUEST);

    let list: Value = app.get("/users", &admin).send().await?.json().await?;
    let users = list.as_array().expect("array");
    assert!(users.iter().any(|u| u["login"] == login.as_str()));
    assert!(users.iter().all(|u| u.get("password").is_none()));
    Ok(())
}

#[tokio::test]
async fn role_change_reaches_live_sessions() -> Result<()> {
    let Some(app) = spawn_db_app().await? else {
        return Ok(());
    };
    let admin = app.session_for(34, Role::Admin).await;
    let (id, login, password) = seed_user(&app.state.pool, Role::User).await?;
    let (_, token) = app.login(&login, &password).await?;
    let token = token.expect("session");

    let resp = app
        .patch(&format!("/users/{}/role", id), &admin)
        .json(&json!({ "role": "admin" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.json::<Value>().await?, json!({ "id": id, "role": "admin" }));

    let me: Value = app.get("/auth/me", &token).send().await?.json().await?;
    assert_eq!(me["role"], "admin");
    assert_eq!(app.get("/users", &token).send().await?.status(), StatusCode::OK);

    let resp = app
        .patch(&format!("/users/{}/role", id), &admin)
        .json(&json!({ "role": "no_access" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(app.get("/auth/me", &token).send().await?.status(), StatusCode::UNAUTHORIZED);

    let missing = app
        .patch("/users/2147483000/role", &admin)
        .json(&json!({ "role": "user" }))
        .send()
        .await?;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn deleting_user_revokes_sessions() -> Result<()> {
    let Some(app) = spawn_db_app().await? else {
        return Ok(());
    };
    let admin = app.session_for(35, Role::Admin).await;
    let (id, login, password) = seed_user(&app.state.pool, Role::User).await?;
    let (_, token) = app.login(&login, &password).await?;
    let token = token.expect("session");

    let path = format!("/users/{}", id);
    assert_eq!(app.delete(&path, &admin).send().await?.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.delete(&path, &admin).send().await?.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.get("/auth/me", &token).send().await?.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn employees_directory_crud() -> Result<()> {
    let Some(app) = spawn_db_app().await? else {
        return Ok(());
    };
    let admin = app.session_for(36, Role::Admin).await;
    let name = unique("Сотрудник");

    let resp = app
        .post("/employees", &admin)
        .json(&json!({ "name": format!("  {}  ", name) }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await?;
    assert_eq!(created["name"], name.as_str());
    let id = created["id"].as_i64().expect("id");

    let blank = app.post("/employees", &admin).json(&json!({ "name": "  " })).send().await?;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

    let list: Value = app.get("/employees", &admin).send().await?.json().await?;
    assert!(list.as_array().expect("array").iter().any(|e| e["id"] == id));

    let path = format!("/employees/{}", id);
    assert_eq!(app.delete(&path, &admin).send().await?.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.delete(&path, &admin).send().await?.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn verification_areas_replace_and_normalize() -> Result<()> {
    let Some(app) = spawn_db_app().await? else {
        return Ok(());
    };
    let token = app.session_for(37, Role::User).await;

    let document = json!({
        "items": [{
            "id": "area-1",
            "level1": "  Медицинская деятельность ",
            "level2": [{ "id": "l2", "name": " Лицензирование ", "level3": null }],
            "templates": [{ "id": "t1", "name": " Базовый ", "tags": [" приказ ", "акт"] }]
        }]
    });

    let resp = app.put("/verification-areas", &token).json(&document).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let saved: Value = resp.json().await?;

    let expected = json!({
        "items": [{
            "id": "area-1",
            "level1": "Медицинская деятельность",
            "level2": [{ "id": "l2", "name": "Лицензирование", "level3": [] }],
            "templates": [{ "id": "t1", "name": "Базовый", "tags": ["приказ", "акт"] }]
        }]
    });
    assert_eq!(saved, expected);

    let fetched: Value = app.get("/api/verification-areas", &token).send().await?.json().await?;
    assert_eq!(fetched, expected);
    Ok(())
}
