//! Macros for reducing boilerplate when defining resource records
//!
//! These macros generate the repetitive [`Resource`](crate::core::resource::Resource)
//! implementation needed for each record type.

/// Implement `Resource` for a record struct
///
/// The struct must have an `id: Option<RecordId>` field and an
/// `extra: serde_json::Map<String, Value>` field (usually `#[serde(flatten)]`).
/// Listed fields are exposed by their wire name; any other name is looked up
/// in `extra`.
///
/// # Example
/// ```rust,ignore
/// impl_resource!(CommitteeMember, ResourceKind::CommitteeMember, {
///     "name" => name,
///     "position" => position,
///     "avatar" => avatar,
/// });
/// ```
#[macro_export]
macro_rules! impl_resource {
    ($type:ident, $kind:expr, { $($wire:literal => $field:ident),* $(,)? }) => {
        impl $crate::core::resource::Resource for $type {
            fn kind() -> $crate::core::resource::ResourceKind {
                $kind
            }

            fn id(&self) -> Option<&$crate::core::resource::RecordId> {
                self.id.as_ref()
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                use $crate::core::field::AsFieldValue;
                match field {
                    "id" => Some(self.id.as_field_value()),
                    $($wire => Some(self.$field.as_field_value()),)*
                    other => self.extra.get(other).map($crate::core::field::FieldValue::from),
                }
            }
        }
    };
}
