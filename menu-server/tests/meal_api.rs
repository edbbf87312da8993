mod common;

use common::{PNG_BYTES, meal_fields, spawn};
use http::{Method, StatusCode};
use menu_server::ErrorCode;
use serde_json::json;

#[tokio::test]
async fn test_create_and_read_meal() {
    let app = spawn().await;

    let (status, body) = app
        .multipart(
            "/api/meals",
            Some(&app.admin_token),
            &meal_fields("Lamb Tagine"),
            Some(("dish.png", PNG_BYTES)),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "The meal has been added successfully");

    let (status, body) = app.get("/api/meals", None).await;
    assert_eq!(status, StatusCode::OK);
    let meals = body["data"].as_array().unwrap();
    assert_eq!(meals.len(), 1);
    assert_eq!(meals[0]["name"], "Lamb Tagine");
    assert_eq!(meals[0]["type"], "non-vegetarian");
    assert_eq!(meals[0]["category_name"], "Mains");
    assert_eq!(meals[0]["cost"], 9.5);
    assert_eq!(meals[0]["size"], 2);

    let id = meals[0]["id"].as_i64().unwrap();
    let (status, body) = app.get(&format!("/api/meals/{id}/size-costs"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!([{"id": body["data"][0]["id"], "meal_id": id, "cost": 9.5, "size": 2}])
    );

    // The stored image is downloadable
    let image = meals[0]["image"].as_str().unwrap();
    let (status, _) = app.get(&format!("/storage/{image}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_writes_require_admin() {
    let app = spawn().await;
    let fields = meal_fields("Lamb Tagine");

    let (status, body) = app
        .multipart("/api/meals", None, &fields, Some(("dish.png", PNG_BYTES)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "failed");

    let (status, body) = app
        .multipart(
            "/api/meals",
            Some(&app.staff_token),
            &fields,
            Some(("dish.png", PNG_BYTES)),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], ErrorCode::AdminRequired.code());

    let (status, _) = app.delete("/api/meals/1", Some("not-a-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_validation_envelope() {
    let app = spawn().await;
    let fields = [
        ("name", "Ab"),
        ("description", "Delicious!"),
        ("type", "vegan"),
        ("category_id", "1"),
        ("size", "2"),
        ("cost", "9.5"),
    ];

    let (status, body) = app
        .multipart("/api/meals", Some(&app.admin_token), &fields, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["code"], ErrorCode::ValidationFailed.code());
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["error"]["name"], json!(["The name format is invalid."]));
    assert_eq!(body["error"]["type"], json!(["The selected type is invalid."]));
    assert_eq!(body["error"]["image"], json!(["The image field is required."]));
    assert!(body["error"].get("description").is_none());
}

#[tokio::test]
async fn test_inactive_meals_hidden_from_guests() {
    let app = spawn().await;
    app.create_meal(&meal_fields("Lamb Tagine")).await;
    let mut hidden = meal_fields("Beef Stew");
    hidden.push(("status", "0"));
    let hidden_id = app.create_meal(&hidden).await;

    let (_, body) = app.get("/api/meals", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let (_, body) = app.get("/api/meals", Some(&app.admin_token)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // A bad token is an ordinary guest on public routes
    let (status, body) = app.get("/api/meals", Some("garbage")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = app.get(&format!("/api/meals/{hidden_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Meal not found");
    let (status, _) = app
        .get(&format!("/api/meals/{hidden_id}"), Some(&app.admin_token))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/meals/status/inactive", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No meals found for this status");

    let (status, body) = app
        .get("/api/meals/status/inactive", Some(&app.admin_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Beef Stew");

    let (status, body) = app.get("/api/meals/status/paused", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Invalid status value. Please enter active or inactive"
    );
}

#[tokio::test]
async fn test_category_pagination() {
    let app = spawn().await;
    let names = [
        "Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot", "Golf", "Hotel", "India",
        "Juliett", "Kilo", "Lima", "Mike",
    ];
    for name in names {
        app.create_meal(&meal_fields(name)).await;
    }

    let (status, body) = app.get("/api/meals/category/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 12);
    assert_eq!(
        body["pagination"],
        json!({"total": 13, "per_page": 12, "current_page": 1, "last_page": 2})
    );

    let (_, body) = app.get("/api/meals/category/1?page=2", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], "Mike");

    // Unparseable pages fall back to the first one
    let (status, body) = app.get("/api/meals/category/1?page=abc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["current_page"], 1);

    let (status, body) = app.get("/api/meals/category/1?page=3", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Page number exceeds the last available page");

    let (status, body) = app.get("/api/meals/category/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No meals found for this category");

    let (status, body) = app.get("/api/meals/category/9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Category not found");
}

#[tokio::test]
async fn test_filter_by_type() {
    let app = spawn().await;
    app.create_meal(&meal_fields("Lamb Tagine")).await;

    let (status, body) = app.get("/api/meals/type/non-vegetarian", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = app.get("/api/meals/type/vegetarian", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No meals found for this type");

    let (status, body) = app.get("/api/meals/type/vegan", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid type");
}

#[tokio::test]
async fn test_multi_field_filter() {
    let app = spawn().await;
    let id = app.create_meal(&meal_fields("Lamb Tagine")).await;
    app.create_meal(&meal_fields("Beef Stew")).await;
    app.json(
        Method::POST,
        &format!("/api/meals/{id}/size-costs"),
        Some(&app.admin_token),
        json!({"size": 1, "cost": 6, "number_of_pieces": 2}),
    )
    .await;

    let (status, body) = app
        .get("/api/meals/filter?name=TAGINE&number_of_pieces=2", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let meals = body["data"].as_array().unwrap();
    assert_eq!(meals.len(), 1);
    assert_eq!(meals[0]["id"], id);
    assert_eq!(meals[0]["cost"], 6.0);
    assert_eq!(meals[0]["category_name"], "Mains");

    let (_, body) = app.get("/api/meals/filter?size=2", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = app.get("/api/meals/filter?cost=cheap", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["cost"], json!(["The cost must be a number."]));

    let (status, body) = app.get("/api/meals/filter?name=pizza", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No meals found with the given filters");
}

#[tokio::test]
async fn test_update_meal() {
    let app = spawn().await;
    let id = app.create_meal(&meal_fields("Lamb Tagine")).await;
    let uri = format!("/api/meals/{id}");

    let (status, body) = app
        .multipart(
            &uri,
            Some(&app.admin_token),
            &[("description", "Now with apricots and almonds"), ("size", "3"), ("cost", "14")],
            Some(("new.png", PNG_BYTES)),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "The meal has been updated successfully");

    let (_, body) = app.get(&format!("{uri}/size-costs"), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = app.get(&uri, None).await;
    assert_eq!(body["data"]["description"], "Now with apricots and almonds");
    assert_eq!(body["data"]["name"], "Lamb Tagine");

    // JSON bodies are accepted too
    let (status, body) = app
        .json(
            Method::POST,
            &uri,
            Some(&app.admin_token),
            json!({"number_of_pieces": 4}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["size"],
        json!(["The size field is required when cost / number of pieces is present."])
    );

    let (status, body) = app
        .json(Method::POST, "/api/meals/999", Some(&app.admin_token), json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Meal not found");
}

#[tokio::test]
async fn test_size_cost_conflicts() {
    let app = spawn().await;
    let id = app.create_meal(&meal_fields("Lamb Tagine")).await;
    let uri = format!("/api/meals/{id}/size-costs");

    let (status, body) = app
        .json(Method::POST, &uri, Some(&app.admin_token), json!({"size": 2, "cost": 10}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Size already exists for this meal");

    let (status, _) = app
        .json(Method::POST, &uri, Some(&app.admin_token), json!({"size": 3, "cost": 12}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get(&uri, None).await;
    let size_two = body["data"][0]["id"].as_i64().unwrap();

    let (status, body) = app
        .json(
            Method::POST,
            &uri,
            Some(&app.admin_token),
            json!({"id": size_two, "size": 3, "cost": 10}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"],
        "Size already exists for this meal with another record"
    );

    let (status, body) = app
        .json(
            Method::POST,
            &uri,
            Some(&app.admin_token),
            json!({"id": 4242, "size": 4, "cost": 10}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Size cost not found");
}

#[tokio::test]
async fn test_delete_meal() {
    let app = spawn().await;
    let id = app.create_meal(&meal_fields("Lamb Tagine")).await;

    let (status, body) = app
        .delete(&format!("/api/meals/{id}"), Some(&app.admin_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Meal deleted successfully");

    let (status, body) = app.get(&format!("/api/meals/{id}/size-costs"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Meal not found");

    let (status, _) = app
        .delete(&format!("/api/meals/{id}"), Some(&app.admin_token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let app = spawn().await;
    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}
