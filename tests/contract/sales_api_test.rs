// Contract: sales registration and summaries

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{test, App};
use chrono::Utc;
use helpers::*;
use rust_decimal_macros::dec;
use salon_admin::core::Currency;
use salon_admin::modules::sales::models::{EmployeeSalesSummary, SaleWithItems};
use salon_admin::modules::users::models::{Role, User};
use serde_json::{json, Value};

struct Team {
    backend: TestBackend,
    cashier: User,
    stylist: User,
}

fn team() -> Team {
    let backend = TestBackend::new();
    let cashier = staff("Sara", "Gil", Role::Cashier);
    let stylist = staff("Ana", "Ruiz", Role::Employee);
    backend
        .users
        .users
        .lock()
        .unwrap()
        .extend([cashier.clone(), stylist.clone()]);
    Team {
        backend,
        cashier,
        stylist,
    }
}

fn sale_body(employee: &User) -> Value {
    json!({
        "employeeId": employee.id,
        "paymentMethod": "transaction",
        "items": [
            { "serviceName": "Corte", "unitCost": "20000", "quantity": 2 },
            { "serviceName": "Cepillado", "unitCost": "15000", "quantity": 1, "employeeEarnings": "9000" }
        ]
    })
}

#[actix_web::test]
async fn test_cashier_registers_sale() {
    let t = team();
    let app = test::init_service(App::new().configure(t.backend.routes())).await;

    let req = test::TestRequest::post()
        .uri("/api/sales")
        .insert_header(bearer(t.cashier.id))
        .set_json(sale_body(&t.stylist))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["sale"]["paymentMethod"], "transfer");
    assert_eq!(body["items"].as_array().unwrap().len(), 2);

    let records = t.backend.sales.records.lock().unwrap().clone();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].employee_id, t.stylist.id);
    assert_eq!(records[0].total_amount, dec!(55000));
    assert_eq!(records[0].earnings_amount, dec!(29000));
}

#[actix_web::test]
async fn test_employee_cannot_register_sale() {
    let t = team();
    let app = test::init_service(App::new().configure(t.backend.routes())).await;

    let req = test::TestRequest::post()
        .uri("/api/sales")
        .insert_header(bearer(t.stylist.id))
        .set_json(sale_body(&t.stylist))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
    assert!(t.backend.sales.records.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn test_sale_for_unknown_employee_is_400() {
    let t = team();
    let app = test::init_service(App::new().configure(t.backend.routes())).await;
    let ghost = staff("Nadie", "Nunca", Role::Employee);

    let req = test::TestRequest::post()
        .uri("/api/sales")
        .insert_header(bearer(t.cashier.id))
        .set_json(sale_body(&ghost))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_sale_amounts_checked_in_configured_currency() {
    let t = team();
    let app = test::init_service(
        App::new().configure(t.backend.routes_with(TEST_TZ, Currency::USD)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/sales")
        .insert_header(bearer(t.cashier.id))
        .set_json(json!({
            "employeeId": t.stylist.id,
            "paymentMethod": "cash",
            "items": [{ "serviceName": "Corte", "unitCost": 10.505, "quantity": 1 }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("USD amounts"));
    assert!(t.backend.sales.records.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn test_summary_lists_every_employee() {
    let t = team();
    let now = Utc::now();
    t.backend.sales.records.lock().unwrap().push(sale_record(
        1,
        t.stylist.id,
        dec!(40000),
        dec!(20000),
        now,
    ));
    t.backend
        .sales
        .items
        .lock()
        .unwrap()
        .push(sale_item(1, 1, "Corte", dec!(40000)));
    let app = test::init_service(App::new().configure(t.backend.routes())).await;

    let req = test::TestRequest::get()
        .uri("/api/sales/summary?filterType=current_month")
        .insert_header(bearer(t.cashier.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    let data = body["data"].as_array().expect("data array");
    assert_eq!(data.len(), 2);

    let stylist = data
        .iter()
        .find(|e| e["employeeId"] == json!(t.stylist.id))
        .expect("stylist present");
    assert_eq!(stylist["name"], "Ana Ruiz");
    assert_eq!(stylist["salesRecords"].as_array().unwrap().len(), 1);
    assert_eq!(
        stylist["salesRecords"][0]["items"][0]["serviceName"],
        "Corte"
    );

    let cashier = data
        .iter()
        .find(|e| e["employeeId"] == json!(t.cashier.id))
        .expect("cashier present");
    assert!(cashier["salesRecords"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_summary_rejects_incomplete_filter() {
    let t = team();
    let app = test::init_service(App::new().configure(t.backend.routes())).await;

    let req = test::TestRequest::get()
        .uri("/api/sales/summary?filterType=specific_week")
        .insert_header(bearer(t.cashier.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::get()
        .uri("/api/sales/summary?filterType=last_year")
        .insert_header(bearer(t.cashier.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_procedure_summary_forwards_filter() {
    let t = team();
    let app = test::init_service(App::new().configure(t.backend.routes())).await;

    let req = test::TestRequest::post()
        .uri("/api/sales-summary")
        .insert_header(bearer(t.cashier.id))
        .set_json(json!({
            "filterType": "specific_month",
            "month": 3,
            "year": 2025,
            "userId": t.stylist.id
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "data": [] }));

    let calls = t.backend.sales.procedure_calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].filter_type, "specific_month");
    assert_eq!(calls[0].month, Some(3));
    assert_eq!(calls[0].employee_id, Some(t.stylist.id));
    assert_eq!(calls[0].limit, 100);
    assert_eq!(calls[0].tz, "America/Bogota");
}

#[actix_web::test]
async fn test_procedure_summary_uses_configured_timezone() {
    let t = team();
    let app = test::init_service(App::new().configure(
        t.backend
            .routes_with(chrono_tz::America::Mexico_City, Currency::COP),
    ))
    .await;

    let req = test::TestRequest::post()
        .uri("/api/sales-summary")
        .insert_header(bearer(t.cashier.id))
        .set_json(json!({ "filterType": "specific_day", "day": "2025-03-10" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let calls = t.backend.sales.procedure_calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].tz, "America/Mexico_City");
    assert_eq!(calls[0].day.as_deref(), Some("2025-03-10"));
}

#[actix_web::test]
async fn test_product_sale_checks_stock() {
    let t = team();
    t.backend
        .products
        .products
        .lock()
        .unwrap()
        .push(product(7, "Shampoo", 1, dec!(25000)));
    let app = test::init_service(App::new().configure(t.backend.routes())).await;

    let req = test::TestRequest::post()
        .uri("/api/product-sales")
        .insert_header(bearer(t.cashier.id))
        .set_json(json!({ "productId": 7, "quantity": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::post()
        .uri("/api/product-sales")
        .insert_header(bearer(t.cashier.id))
        .set_json(json!({ "productId": 404, "quantity": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::post()
        .uri("/api/product-sales")
        .insert_header(bearer(t.cashier.id))
        .set_json(json!({ "productId": 7, "quantity": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
}

const MIGRATION: &str = include_str!("../../migrations/0001_init.sql");

fn collect_keys(value: &Value, keys: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                keys.push(key.clone());
                collect_keys(nested, keys);
            }
        }
        Value::Array(values) => values.iter().for_each(|v| collect_keys(v, keys)),
        _ => {}
    }
}

#[::core::prelude::v1::test]
fn test_stored_summary_emits_in_process_shape() {
    let stylist = staff("Ana", "Ruiz", Role::Employee);
    let summary = EmployeeSalesSummary {
        employee_id: stylist.id,
        name: stylist.full_name(),
        total: dec!(600),
        earned: dec!(300),
        sales_records: vec![SaleWithItems {
            record: sale_record(1, stylist.id, dec!(600), dec!(300), Utc::now()),
            items: vec![sale_item(1, 1, "Corte", dec!(600))],
        }],
    };
    let mut keys = Vec::new();
    collect_keys(&serde_json::to_value(&summary).unwrap(), &mut keys);

    let function = MIGRATION
        .split("CREATE OR REPLACE FUNCTION get_sales_summary")
        .nth(1)
        .expect("summary function present");

    for key in &keys {
        assert!(
            function.contains(&format!("'{}'", key)),
            "stored summary does not emit {}",
            key
        );
    }
    assert!(!function.contains("u.created_at,"));
    assert!(!function.contains("salesCount"));
}
