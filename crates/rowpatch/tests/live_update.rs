//! Runs against a real database when `DATABASE_URL` is set.

use rowpatch::prelude::*;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Entity)]
struct Person {
    #[orm(id)]
    id: i64,
    name: String,
    age: i32,
}

fn database_url(test: &str) -> Option<String> {
    dotenvy::dotenv().ok();
    match std::env::var("DATABASE_URL") {
        Ok(v) => Some(v),
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping {test}");
            None
        }
    }
}

fn unique_table(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before UNIX_EPOCH")
        .as_nanos();
    format!("{prefix}_{}_{nanos}", std::process::id())
}

#[tokio::test]
async fn update_rows_async() -> PatchResult<()> {
    let Some(url) = database_url("update_rows_async") else {
        return Ok(());
    };
    let table = unique_table("rowpatch_async");
    let mut conn = PgConnection::connect_url(&url)?;
    conn.open().await?;
    conn.execute(
        &format!("CREATE TABLE {table} (id BIGINT PRIMARY KEY, name TEXT, age INT)"),
        &[],
        None,
    )
    .await?;
    conn.execute(
        &format!("INSERT INTO {table} VALUES (1, 'Ann', 20), (2, 'Bob', 30), (3, 'Cy', 40)"),
        &[],
        None,
    )
    .await?;

    let person = Person {
        id: 2,
        name: "Robert".into(),
        age: 31,
    };
    let mut q = update(Some(&person));
    q.table(table.as_str())?
        .add_all_columns()?
        .use_entity_identity()?
        .where_(col(Person::COL_ID).eq(person.id))?;
    let result = q.commit_async(&mut conn).await;

    let cleanup = conn
        .execute(&format!("DROP TABLE {table}"), &[], None)
        .await;
    assert_eq!(result?, 1);
    cleanup?;
    Ok(())
}

#[test]
fn update_rows_blocking() -> PatchResult<()> {
    let Some(url) = database_url("update_rows_blocking") else {
        return Ok(());
    };
    let table = unique_table("rowpatch_blocking");
    let mut conn = BlockingPgConnection::connect_url(&url)?;
    conn.open()?;
    conn.execute(
        &format!("CREATE TABLE {table} (id BIGINT PRIMARY KEY, name TEXT, age INT)"),
        &[],
        None,
    )?;
    conn.execute(
        &format!("INSERT INTO {table} VALUES (1, 'Ann', 20), (2, 'Bob', 30), (3, 'Cy', 40)"),
        &[],
        None,
    )?;

    let person = Person {
        id: 0,
        name: "n/a".into(),
        age: 50,
    };
    let mut q = update(Some(&person));
    q.table(table.as_str())?
        .add_column(Person::COL_AGE)?
        .where_(col(Person::COL_AGE).gte(30))?;
    let result = q.commit(&mut conn);

    let cleanup = conn.execute(&format!("DROP TABLE {table}"), &[], None);
    assert_eq!(result?, 2);
    cleanup?;
    Ok(())
}

#[test]
fn blocking_timeout_cancels_the_server_query() -> PatchResult<()> {
    let Some(url) = database_url("blocking_timeout_cancels_the_server_query") else {
        return Ok(());
    };
    let table = unique_table("rowpatch_slow");
    let mut conn = BlockingPgConnection::connect_url(&url)?;
    conn.open()?;
    conn.execute(
        &format!("CREATE TABLE {table} (id BIGINT PRIMARY KEY, name TEXT, age INT)"),
        &[],
        None,
    )?;
    conn.execute(&format!("INSERT INTO {table} VALUES (1, 'Ann', 20)"), &[], None)?;
    conn.execute(
        &format!(
            "CREATE FUNCTION {table}_slow() RETURNS trigger AS $$ \
             BEGIN PERFORM pg_sleep(3); RETURN NEW; END $$ LANGUAGE plpgsql"
        ),
        &[],
        None,
    )?;
    conn.execute(
        &format!(
            "CREATE TRIGGER {table}_slow BEFORE UPDATE ON {table} \
             FOR EACH ROW EXECUTE FUNCTION {table}_slow()"
        ),
        &[],
        None,
    )?;

    let person = Person {
        id: 1,
        name: "Ann".into(),
        age: 21,
    };
    let mut q = update(Some(&person));
    q.table(table.as_str())?
        .add_column(Person::COL_AGE)?
        .with_timeout_secs(1)
        .where_(col(Person::COL_ID).eq(person.id))?;
    let result = q.commit(&mut conn);

    // Give the server a moment to act on the cancel request.
    std::thread::sleep(std::time::Duration::from_millis(300));
    let mut observer = BlockingPgConnection::connect_url(&url)?;
    observer.open()?;
    let still_running = observer.execute(
        &format!(
            "SELECT pid FROM pg_stat_activity \
             WHERE state = 'active' AND query LIKE 'UPDATE %{table} SET%'"
        ),
        &[],
        None,
    );
    // The next statement on the same connection must not be the one cancelled.
    let next = conn.execute("SELECT 1", &[], None);

    let cleanup = conn
        .execute(&format!("DROP TABLE {table}"), &[], None)
        .and_then(|_| conn.execute(&format!("DROP FUNCTION {table}_slow()"), &[], None));
    assert!(matches!(result, Err(PatchError::Timeout(_))), "{result:?}");
    assert_eq!(still_running?, 0);
    assert_eq!(next?, 1);
    cleanup?;
    Ok(())
}
