use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::book::{Book, BookChanges, NewBook};
use crate::domain::errors::DomainError;
use crate::domain::ports::BookRepository;
use crate::schema::books;

use super::models::{BookChangeset, BookRow, NewBookRow};

#[derive(Clone)]
pub struct DieselBookRepository {
    pool: DbPool,
}

impl DieselBookRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl BookRepository for DieselBookRepository {
    fn get_or_create(&self, book: NewBook) -> Result<(Book, bool), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let existing = books::table
                .filter(books::name.eq(&book.name))
                .filter(books::author.eq(&book.author))
                .select(BookRow::as_select())
                .first(conn)
                .optional()?;

            if let Some(row) = existing {
                return Ok((row.into(), false));
            }

            let row = diesel::insert_into(books::table)
                .values(&NewBookRow {
                    name: &book.name,
                    author: &book.author,
                    price: book.price.into_inner(),
                })
                .returning(BookRow::as_returning())
                .get_result(conn)?;

            log::debug!("created book {} '{}' by {}", row.id, row.name, row.author);
            Ok((row.into(), true))
        })
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = books::table
            .find(id)
            .select(BookRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Book::from))
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Book>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = books::table
            .filter(books::name.eq(name))
            .select(BookRow::as_select())
            .order(books::id.asc())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Book::from))
    }

    fn list(&self) -> Result<Vec<Book>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = books::table
            .select(BookRow::as_select())
            .order(books::id.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    fn update(&self, id: i32, changes: BookChanges) -> Result<Option<Book>, DomainError> {
        if changes.is_empty() {
            return self.find_by_id(id);
        }

        let mut conn = self.pool.get()?;

        let row = diesel::update(books::table.find(id))
            .set(&BookChangeset {
                name: changes.name,
                author: changes.author,
                price: changes.price.map(|p| p.into_inner()),
            })
            .returning(BookRow::as_returning())
            .get_result(&mut conn)
            .optional()?;

        Ok(row.map(Book::from))
    }

    fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        // order_item_books rows go with it through ON DELETE CASCADE.
        let deleted = diesel::delete(books::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::DieselBookRepository;
    use crate::domain::book::{BookChanges, NewBook, Price};
    use crate::domain::errors::DomainError;
    use crate::domain::ports::BookRepository;
    use crate::infrastructure::test_db::setup_db;

    fn new_book(name: &str, author: &str, price: &str) -> NewBook {
        NewBook {
            name: name.to_string(),
            author: author.to_string(),
            price: Price::from_str(price).expect("valid price"),
        }
    }

    #[tokio::test]
    async fn get_or_create_dedups_on_name_and_author() {
        let (_container, pool) = setup_db().await;
        let repo = DieselBookRepository::new(pool);

        let (first, created) = repo
            .get_or_create(new_book("The Last Library", "A. Writer", "12.50"))
            .expect("create failed");
        assert!(created);

        let (again, created) = repo
            .get_or_create(new_book("The Last Library", "A. Writer", "99.00"))
            .expect("lookup failed");
        assert!(!created);
        assert_eq!(again.id, first.id);
        assert_eq!(again.price, first.price, "existing price is kept");

        let (other, created) = repo
            .get_or_create(new_book("The Last Library", "B. Writer", "12.50"))
            .expect("create failed");
        assert!(created);
        assert_ne!(other.id, first.id);

        assert_eq!(repo.list().expect("list failed").len(), 2);
    }

    #[tokio::test]
    async fn find_by_name_ignores_the_author() {
        let (_container, pool) = setup_db().await;
        let repo = DieselBookRepository::new(pool);

        let (first, _) = repo
            .get_or_create(new_book("The Silent Watcher", "A. Writer", "12.50"))
            .expect("create failed");
        repo.get_or_create(new_book("The Silent Watcher", "B. Writer", "14.00"))
            .expect("create failed");

        let found = repo
            .find_by_name("The Silent Watcher")
            .expect("lookup failed")
            .expect("book should exist");
        assert_eq!(found.id, first.id);
        assert!(repo.find_by_name("Unknown Title").expect("lookup failed").is_none());
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() {
        let (_container, pool) = setup_db().await;
        let repo = DieselBookRepository::new(pool);
        let (book, _) = repo
            .get_or_create(new_book("Whispers in the Fog", "C. Author", "20.00"))
            .expect("create failed");

        let updated = repo
            .update(
                book.id,
                BookChanges {
                    price: Some(Price::from_str("22.75").unwrap()),
                    ..Default::default()
                },
            )
            .expect("update failed")
            .expect("book should exist");

        assert_eq!(updated.name, "Whispers in the Fog");
        assert_eq!(updated.author, "C. Author");
        assert_eq!(updated.price.to_string(), "22.75");
    }

    #[tokio::test]
    async fn update_unknown_id_returns_none() {
        let (_container, pool) = setup_db().await;
        let repo = DieselBookRepository::new(pool);

        let changes = BookChanges {
            name: Some("Nothing".to_string()),
            ..Default::default()
        };
        assert!(repo.update(999, changes).expect("update failed").is_none());
        assert!(repo.update(999, BookChanges::default()).expect("update failed").is_none());
    }

    #[tokio::test]
    async fn renaming_onto_an_existing_pair_conflicts() {
        let (_container, pool) = setup_db().await;
        let repo = DieselBookRepository::new(pool);
        repo.get_or_create(new_book("First", "Same Author", "1.00")).unwrap();
        let (second, _) = repo.get_or_create(new_book("Second", "Same Author", "1.00")).unwrap();

        let err = repo
            .update(
                second.id,
                BookChanges {
                    name: Some("First".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_unknown_id_leaves_store_unchanged() {
        let (_container, pool) = setup_db().await;
        let repo = DieselBookRepository::new(pool);
        repo.get_or_create(new_book("Kept", "Someone", "5.00")).unwrap();

        assert!(!repo.delete(12345).expect("delete failed"));
        assert_eq!(repo.list().unwrap().len(), 1);
    }
}
