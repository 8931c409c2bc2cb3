use contactbook_core::db::migrations::latest_version;
use contactbook_core::db::open_db_in_memory;
use contactbook_core::{
    Contact, ContactField, ContactFields, ContactRepository, ContactValidationError, RepoError,
    SqliteContactRepository,
};
use rusqlite::Connection;

fn ada() -> ContactFields {
    ContactFields::new("Ada", "Lovelace", "ada@example.com", "5550100")
}

fn alan() -> ContactFields {
    ContactFields::new("Alan", "Turing", "alan@example.com", "5550101")
}

#[test]
fn insert_assigns_fresh_ids_and_get_roundtrips() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::try_new(&conn).unwrap();

    let first = repo.insert_contact(&Contact::new(ada())).unwrap();
    let second = repo.insert_contact(&Contact::new(alan())).unwrap();

    assert!(first > 0);
    assert!(second > first);

    let loaded = repo.get_contact(first).unwrap().unwrap();
    assert_eq!(loaded, Contact::with_id(first, ada()));
    assert!(repo.get_contact(second + 100).unwrap().is_none());
}

#[test]
fn insert_keeps_explicit_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::try_new(&conn).unwrap();

    let id = repo.insert_contact(&Contact::with_id(77, ada())).unwrap();

    assert_eq!(id, 77);
    assert_eq!(repo.get_contact(77).unwrap().unwrap().first_name, "Ada");
}

#[test]
fn list_returns_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::try_new(&conn).unwrap();

    let zed = ContactFields::new("Zed", "Zulu", "zed@example.com", "5550102");
    repo.insert_contact(&Contact::new(zed)).unwrap();
    repo.insert_contact(&Contact::new(ada())).unwrap();
    repo.insert_contact(&Contact::new(alan())).unwrap();

    let names: Vec<_> = repo
        .list_contacts()
        .unwrap()
        .into_iter()
        .map(|contact| contact.first_name)
        .collect();
    assert_eq!(names, ["Zed", "Ada", "Alan"]);
}

#[test]
fn update_changes_only_target_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    let ada_id = repo.insert_contact(&Contact::new(ada())).unwrap();
    let alan_id = repo.insert_contact(&Contact::new(alan())).unwrap();

    let mut edited = repo.get_contact(ada_id).unwrap().unwrap();
    edited.email = "countess@example.com".to_string();
    assert!(repo.update_contact(&edited).unwrap());

    let reloaded = repo.get_contact(ada_id).unwrap().unwrap();
    assert_eq!(reloaded.id, ada_id);
    assert_eq!(reloaded.email, "countess@example.com");
    assert_eq!(reloaded.first_name, "Ada");
    assert_eq!(
        repo.get_contact(alan_id).unwrap().unwrap(),
        Contact::with_id(alan_id, alan())
    );
}

#[test]
fn update_and_delete_of_missing_id_are_noops() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    repo.insert_contact(&Contact::new(ada())).unwrap();

    assert!(!repo.update_contact(&Contact::with_id(999, alan())).unwrap());
    assert!(!repo.delete_contact(999).unwrap());
    assert_eq!(repo.list_contacts().unwrap().len(), 1);
}

#[test]
fn delete_removes_exactly_one_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    let ada_id = repo.insert_contact(&Contact::new(ada())).unwrap();
    let alan_id = repo.insert_contact(&Contact::new(alan())).unwrap();

    assert!(repo.delete_contact(ada_id).unwrap());

    let remaining = repo.list_contacts().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, alan_id);
}

#[test]
fn validation_failure_blocks_insert_and_update() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::try_new(&conn).unwrap();

    let blank_phone = ContactFields::new("Ada", "Lovelace", "ada@example.com", "");
    let err = repo.insert_contact(&Contact::new(blank_phone)).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ContactValidationError::EmptyField(ContactField::PhoneNumber))
    ));

    let id = repo.insert_contact(&Contact::new(ada())).unwrap();
    let mut edited = Contact::with_id(id, ada());
    edited.last_name.clear();
    assert!(matches!(
        repo.update_contact(&edited).unwrap_err(),
        RepoError::Validation(_)
    ));
    assert_eq!(repo.get_contact(id).unwrap().unwrap().last_name, "Lovelace");
}

#[test]
fn list_returns_rows_with_empty_fields_as_stored() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    let ada_id = repo.insert_contact(&Contact::new(ada())).unwrap();
    conn.execute(
        "INSERT INTO contacts (first_name, last_name, email, phone_number)
         VALUES ('', 'Nobody', 'x@example.com', '1');",
        [],
    )
    .unwrap();

    let listed = repo.list_contacts().unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0], Contact::with_id(ada_id, ada()));
    assert_eq!(listed[1].first_name, "");
    assert_eq!(listed[1].last_name, "Nobody");
    assert_eq!(
        repo.get_contact(listed[1].id).unwrap().unwrap(),
        listed[1]
    );
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteContactRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_contacts_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteContactRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("contacts"))
    ));
}

#[test]
fn repository_rejects_connection_missing_phone_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE contacts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteContactRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "contacts",
            column: "phone_number"
        })
    ));
}
