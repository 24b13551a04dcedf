//! Sample inputs shown by `patchview --example`.

/// A small person record.
pub const EXAMPLE_DOCUMENT: &str = r#"{
  "name": "John Doe",
  "age": 30,
  "city": "New York",
  "hobbies": [
    "reading",
    "swimming"
  ],
  "address": {
    "street": "123 Main St",
    "zip": "10001"
  }
}"#;

/// Exercises replace, add, remove and append against [`EXAMPLE_DOCUMENT`].
pub const EXAMPLE_PATCH: &str = r#"[
  {
    "op": "replace",
    "path": "/age",
    "value": 31
  },
  {
    "op": "add",
    "path": "/email",
    "value": "john@example.com"
  },
  {
    "op": "remove",
    "path": "/city"
  },
  {
    "op": "add",
    "path": "/hobbies/-",
    "value": "cycling"
  },
  {
    "op": "replace",
    "path": "/address/street",
    "value": "456 Oak Ave"
  }
]"#;
