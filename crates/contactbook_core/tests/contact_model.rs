use contactbook_core::{Contact, ContactField, ContactFields, NEW_CONTACT_ID};

#[test]
fn contact_serialization_uses_snake_case_fields() {
    let contact = Contact::with_id(
        42,
        ContactFields::new("Ada", "Lovelace", "ada@example.com", "5550100"),
    );

    let json = serde_json::to_value(&contact).unwrap();
    assert_eq!(json["id"], 42);
    assert_eq!(json["first_name"], "Ada");
    assert_eq!(json["last_name"], "Lovelace");
    assert_eq!(json["email"], "ada@example.com");
    assert_eq!(json["phone_number"], "5550100");

    let decoded: Contact = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, contact);
}

#[test]
fn field_order_matches_form_order() {
    assert_eq!(
        ContactField::ORDERED,
        [
            ContactField::FirstName,
            ContactField::LastName,
            ContactField::Email,
            ContactField::PhoneNumber,
        ]
    );
    assert_eq!(
        serde_json::to_value(ContactField::PhoneNumber).unwrap(),
        "phone_number"
    );
}

#[test]
fn fields_roundtrip_through_contact() {
    let fields = ContactFields::new("Grace", "Hopper", "grace@example.com", "5550199");
    let contact = Contact::new(fields.clone());

    assert_eq!(contact.id, NEW_CONTACT_ID);
    assert_eq!(contact.fields(), fields);
}
