//! Update one row of a `people` table.
//!
//! ```text
//! DATABASE_URL=postgres://postgres@localhost/app cargo run -p rowpatch --example update_entity
//! ```

use rowpatch::prelude::*;

#[derive(Entity)]
#[orm(table = "people")]
struct Person {
    #[orm(id)]
    id: i64,
    #[orm(column = "full_name")]
    name: String,
    age: i32,
    email: Option<String>,
}

#[tokio::main]
async fn main() -> PatchResult<()> {
    dotenvy::dotenv().ok();

    let person = Person {
        id: 1,
        name: "Ann Example".into(),
        age: 34,
        email: None,
    };

    let mut q = update(Some(&person));
    q.add_all_columns()?
        .use_entity_identity()?
        .where_(col(Person::COL_ID).eq(person.id))?
        .and(col(Person::COL_EMAIL).is_null())?;

    let preview = q.build("app")?;
    println!("{}", preview.sql());
    for param in preview.params() {
        println!("  {} = {:?}", param.name, param.value);
    }

    let Ok(url) = std::env::var("DATABASE_URL") else {
        println!("DATABASE_URL is not set; not executing");
        return Ok(());
    };
    let mut conn = PgConnection::connect_url(&url)?;
    let rows = q.commit_async(&mut conn).await?;
    println!("updated {rows} row(s)");
    Ok(())
}
