use std::collections::HashMap;

/// Bounded-string codec: providers that cap metadata values force long payloads to be
/// split across sequentially numbered keys (`key_0`, `key_1`, ...) and rebuilt by
/// concatenation. The cap is a persistence-mechanism constraint, so it stays out of
/// the domain types and lives here.
pub fn write_chunked(
    out: &mut HashMap<String, String>,
    key: &str,
    value: &str,
    limit: usize,
    chunk_size: usize,
) {
    if value.chars().count() <= limit {
        out.insert(key.to_string(), value.to_string());
        return;
    }

    let chars: Vec<char> = value.chars().collect();
    for (n, piece) in chars.chunks(chunk_size).enumerate() {
        out.insert(format!("{key}_{n}"), piece.iter().collect());
    }
}

/// Rebuilds a value written by `write_chunked`: prefers the unchunked key, otherwise
/// concatenates `key_0`, `key_1`, ... in ascending order until the first missing key.
pub fn read_chunked(metadata: &HashMap<String, String>, key: &str) -> Option<String> {
    if let Some(value) = metadata.get(key) {
        return Some(value.clone());
    }

    let mut joined = String::new();
    let mut n = 0;
    while let Some(part) = metadata.get(&format!("{key}_{n}")) {
        joined.push_str(part);
        n += 1;
    }

    (n > 0).then_some(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_value_stays_under_one_key() {
        let mut map = HashMap::new();
        write_chunked(&mut map, "items", "abc", 500, 490);
        assert_eq!(map.get("items").map(String::as_str), Some("abc"));
        assert_eq!(read_chunked(&map, "items").as_deref(), Some("abc"));
    }

    #[test]
    fn value_at_the_limit_is_not_chunked() {
        let mut map = HashMap::new();
        let value = "x".repeat(500);
        write_chunked(&mut map, "items", &value, 500, 490);
        assert!(map.contains_key("items"));
        assert!(!map.contains_key("items_0"));
    }

    #[test]
    fn long_value_round_trips_through_chunks() {
        let mut map = HashMap::new();
        let value = "y".repeat(1300);
        write_chunked(&mut map, "items", &value, 500, 490);

        assert!(!map.contains_key("items"));
        assert_eq!(map.get("items_0").unwrap().len(), 490);
        assert_eq!(map.get("items_1").unwrap().len(), 490);
        assert_eq!(map.get("items_2").unwrap().len(), 320);
        assert_eq!(read_chunked(&map, "items"), Some(value));
    }

    #[test]
    fn concatenation_stops_at_first_missing_chunk() {
        let mut map = HashMap::new();
        map.insert("items_0".to_string(), "ab".to_string());
        map.insert("items_2".to_string(), "cd".to_string());
        assert_eq!(read_chunked(&map, "items").as_deref(), Some("ab"));
    }

    #[test]
    fn missing_key_reads_as_none() {
        let map = HashMap::new();
        assert_eq!(read_chunked(&map, "items"), None);
    }
}
