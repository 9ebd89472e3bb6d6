use crate::models::Client;

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Case-insensitive substring search over the visible client fields.
/// Accents are not folded: `"sao"` does not match `"São Paulo"`.
pub fn client_matches(client: &Client, term: &str) -> bool {
    if term.trim().is_empty() {
        return true;
    }

    let needle = term.to_lowercase();
    let optional = [&client.phone, &client.cnpj, &client.complement];

    [
        &client.name,
        &client.email,
        &client.street,
        &client.city,
        &client.state,
        &client.neighborhood,
    ]
    .iter()
    .any(|field| contains(field, &needle))
        || optional
            .iter()
            .filter_map(|field| field.as_deref())
            .any(|field| contains(field, &needle))
}

pub fn filter_clients<'a>(clients: &'a [Client], term: &str) -> Vec<&'a Client> {
    clients.iter().filter(|c| client_matches(c, term)).collect()
}
