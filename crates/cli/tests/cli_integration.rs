//! Integration tests driving the front end line by line.

use cli::{App, CliError, Reply};
use inventory::{ErrorKind, InMemoryStore};

fn app() -> App<InMemoryStore> {
    App::new(InMemoryStore::new())
}

async fn output(app: &App<InMemoryStore>, line: &str) -> String {
    match app.handle_line(line).await.unwrap() {
        Reply::Output(output) => output,
        Reply::Quit => panic!("unexpected quit for '{line}'"),
    }
}

#[tokio::test]
async fn add_then_list_and_show() {
    let app = app();
    let added = output(
        &app,
        "add name=\"Coffee Beans\" price=12.99 qty=50 min=20 category=Food",
    )
    .await;
    assert_eq!(added, "Added 'Coffee Beans' with id 1");

    let list = output(&app, "list").await;
    assert!(list.contains("Coffee Beans"));
    assert!(list.contains("$12.99"));

    let detail = output(&app, "show 1").await;
    assert!(detail.contains("Quantity:     50"));
}

#[tokio::test]
async fn stock_movements_show_in_history() {
    let app = app();
    output(&app, "add name=Widget price=2.50 qty=10 min=5").await;

    let moved = output(&app, "out 1 6 sold at fair").await;
    assert!(moved.contains("New quantity: 4"));
    assert!(moved.contains("Warning"));

    let history = output(&app, "history 1").await;
    assert!(history.contains("STOCK_OUT"));
    assert!(history.contains("INITIAL_STOCK"));
    assert!(history.contains("sold at fair"));
}

#[tokio::test]
async fn history_is_capped() {
    let app = app();
    output(&app, "add name=Widget price=1 qty=0").await;
    for _ in 0..25 {
        output(&app, "in 1 1").await;
    }

    let history = output(&app, "history").await;
    // header + separator + entries
    assert_eq!(history.lines().count(), 2 + cli::HISTORY_LIMIT);
}

#[tokio::test]
async fn rejected_operations_are_reported() {
    let app = app();
    output(&app, "add name=Widget price=1 qty=3").await;

    let err = app.handle_line("out 1 5").await.unwrap_err();
    assert!(matches!(&err, CliError::Inventory(e) if e.kind() == ErrorKind::InsufficientStock));
    assert!(err.is_recoverable());

    let err = app.handle_line("update 1").await.unwrap_err();
    assert!(matches!(&err, CliError::Inventory(e) if e.kind() == ErrorKind::NoFieldsGiven));

    let err = app.handle_line("show 99").await.unwrap_err();
    assert_eq!(err.to_string(), "Product not found: 99");
}

#[tokio::test]
async fn empty_search_is_rejected_before_the_manager() {
    let app = app();
    let err = app.handle_line("search").await.unwrap_err();
    assert!(matches!(err, CliError::Command(_)));
}

#[tokio::test]
async fn report_is_json() {
    let app = app();
    output(&app, "add name=Laptop price=999.99 qty=15 category=Electronics").await;
    output(&app, "add name=Pen price=3.99 qty=2").await;

    let report: serde_json::Value = serde_json::from_str(&output(&app, "report").await).unwrap();
    assert_eq!(report["total_products"], 2);
    assert!(report["categories"].get("Uncategorized").is_some());
}

#[tokio::test]
async fn low_with_nothing_low() {
    let app = app();
    output(&app, "add name=Pen price=1 qty=50 min=5").await;
    assert_eq!(
        output(&app, "low").await,
        "All products are above their minimum stock."
    );
}

#[tokio::test]
async fn delete_keeps_history() {
    let app = app();
    output(&app, "add name=Temp price=1 qty=1").await;
    assert_eq!(output(&app, "delete 1").await, "Deleted product 1");
    assert!(output(&app, "history").await.contains("(deleted #1)"));
}

#[tokio::test]
async fn quit_and_blank_lines() {
    let app = app();
    assert_eq!(app.handle_line("").await.unwrap(), Reply::Output(String::new()));
    assert_eq!(app.handle_line("quit").await.unwrap(), Reply::Quit);
}
