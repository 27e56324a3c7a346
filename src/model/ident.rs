use ulid::Ulid;

/// Generate a unique identifier for a section or todo.
///
/// ULIDs carry a millisecond timestamp plus 80 bits of randomness, so ids
/// stay unique across the lifetime of a board without any coordination
/// with previously persisted ids.
pub fn new_id() -> String {
    Ulid::new().to_string().to_lowercase()
}
