//! Contact table mapping.

use crate::directory::contacts::ContactDirectory;
use crate::model::contact::Contact;
use crate::repo::RepoResult;
use rusqlite::{params, Connection};

pub(super) fn load_contacts(conn: &Connection) -> RepoResult<ContactDirectory> {
    let mut stmt = conn.prepare(
        "SELECT name, email, address, birthday
         FROM contacts
         ORDER BY name ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut directory = ContactDirectory::new();
    while let Some(row) = rows.next()? {
        let name: String = row.get("name")?;
        let mut contact = Contact::new(&name)?;
        for phone in load_phones(conn, &name)? {
            contact.add_phone(&phone)?;
        }
        if let Some(email) = row.get::<_, Option<String>>("email")? {
            contact.set_email(&email)?;
        }
        if let Some(address) = row.get::<_, Option<String>>("address")? {
            contact.set_address(&address)?;
        }
        if let Some(birthday) = row.get::<_, Option<String>>("birthday")? {
            contact.set_birthday(&birthday)?;
        }
        directory.add(contact);
    }
    Ok(directory)
}

/// Writes every contact. Caller owns the surrounding transaction and has
/// already cleared the tables.
pub(super) fn insert_contacts(conn: &Connection, contacts: &ContactDirectory) -> RepoResult<()> {
    let mut insert_contact = conn.prepare_cached(
        "INSERT INTO contacts (name, email, address, birthday)
         VALUES (?1, ?2, ?3, ?4);",
    )?;
    let mut insert_phone = conn.prepare_cached(
        "INSERT INTO contact_phones (contact_name, position, phone)
         VALUES (?1, ?2, ?3);",
    )?;

    for contact in contacts.iter() {
        let name = contact.name().as_str();
        insert_contact.execute(params![
            name,
            contact.email().map(|email| email.as_str()),
            contact.address().map(|address| address.as_str()),
            contact.birthday().map(|birthday| birthday.to_string()),
        ])?;
        for (position, phone) in contact.phones().iter().enumerate() {
            insert_phone.execute(params![name, position as i64, phone.as_str()])?;
        }
    }
    Ok(())
}

fn load_phones(conn: &Connection, contact_name: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT phone
         FROM contact_phones
         WHERE contact_name = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([contact_name])?;
    let mut phones = Vec::new();
    while let Some(row) = rows.next()? {
        phones.push(row.get(0)?);
    }
    Ok(phones)
}
