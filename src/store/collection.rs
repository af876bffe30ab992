//! Ordered, id-addressed entity lists.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CenterError, CenterResult};
use crate::models::{
    Assistant, AttendanceRecord, Class, Enrollment, MakeupLesson, Student, TaWorkLog, Teacher,
    Transaction,
};

/// An entity stored in a [`Collection`].
pub trait Entity {
    /// Name used in not-found errors and logs.
    const KIND: &'static str;

    /// The entity's unique id.
    fn id(&self) -> &str;
}

macro_rules! impl_entity {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(
            impl Entity for $ty {
                const KIND: &'static str = $kind;

                fn id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

impl_entity! {
    Student => "student",
    Teacher => "teacher",
    Assistant => "assistant",
    Class => "class",
    Enrollment => "enrollment",
    AttendanceRecord => "attendance record",
    MakeupLesson => "makeup lesson",
    TaWorkLog => "work log",
    Transaction => "transaction",
}

/// Generates a fresh id such as `E-3f2c…`.
pub fn generate_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// An ordered list of entities looked up by id.
///
/// Order is preserved through serialization, which writes a plain JSON array.
///
/// # Example
///
/// ```
/// use classroom_ledger::models::Student;
/// use classroom_ledger::store::Collection;
///
/// let mut students = Collection::default();
/// students.push(Student {
///     id: "S1".to_string(),
///     name: "Nguyen Van A".to_string(),
///     phone: String::new(),
///     email: String::new(),
///     status: Default::default(),
/// });
///
/// assert!(students.contains("S1"));
/// assert!(students.remove("S1").is_some());
/// assert!(students.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection<T>(Vec<T>);

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self(items)
    }
}

impl<T: Entity> Collection<T> {
    /// Number of entities.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the collection holds nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates in stored order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// The entities in stored order.
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Looks up an entity by id.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.0.iter().find(|item| item.id() == id)
    }

    /// Looks up an entity by id for modification.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.0.iter_mut().find(|item| item.id() == id)
    }

    /// Looks up an entity by id, failing with [`CenterError::NotFound`].
    pub fn require(&self, id: &str) -> CenterResult<&T> {
        self.get(id).ok_or_else(|| CenterError::not_found(T::KIND, id))
    }

    /// Like [`Collection::require`], for modification.
    pub fn require_mut(&mut self, id: &str) -> CenterResult<&mut T> {
        self.get_mut(id).ok_or_else(|| CenterError::not_found(T::KIND, id))
    }

    /// Returns true if an entity with `id` exists.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Appends an entity.
    pub fn push(&mut self, item: T) {
        self.0.push(item);
    }

    /// Inserts an entity at the front.
    pub fn push_front(&mut self, item: T) {
        self.0.insert(0, item);
    }

    /// Replaces the entity with the same id in place, returning the old one.
    pub fn replace(&mut self, item: T) -> CenterResult<T> {
        let slot = self.require_mut(item.id())?;
        Ok(std::mem::replace(slot, item))
    }

    /// Removes the entity with `id`, if present.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.0.iter().position(|item| item.id() == id)?;
        Some(self.0.remove(index))
    }

    /// Keeps only the entities matching `keep`, returning how many were removed.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.0.len();
        self.0.retain(keep);
        before - self.0.len()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn make_assistant(id: &str) -> Assistant {
        Assistant {
            id: id.to_string(),
            name: format!("Assistant {}", id),
            phone: String::new(),
            hourly_rate: Decimal::new(45_000, 0),
            status: Default::default(),
        }
    }

    #[test]
    fn test_push_front_and_order() {
        let mut assistants = Collection::default();
        assistants.push(make_assistant("TA1"));
        assistants.push_front(make_assistant("TA2"));
        let ids: Vec<&str> = assistants.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["TA2", "TA1"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut assistants = Collection::from(vec![make_assistant("TA1"), make_assistant("TA2")]);
        let mut updated = make_assistant("TA1");
        updated.name = "Renamed".to_string();

        let old = assistants.replace(updated).unwrap();
        assert_eq!(old.name, "Assistant TA1");
        assert_eq!(assistants.as_slice()[0].name, "Renamed");
    }

    #[test]
    fn test_replace_unknown_is_not_found() {
        let mut assistants: Collection<Assistant> = Collection::default();
        match assistants.replace(make_assistant("TA9")) {
            Err(CenterError::NotFound { entity, id }) => {
                assert_eq!(entity, "assistant");
                assert_eq!(id, "TA9");
            }
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_retain_reports_removed_count() {
        let mut assistants = Collection::from(vec![
            make_assistant("TA1"),
            make_assistant("TA2"),
            make_assistant("TA3"),
        ]);
        assert_eq!(assistants.retain(|a| a.id != "TA2"), 1);
        assert_eq!(assistants.len(), 2);
    }

    #[test]
    fn test_serializes_as_array() {
        let assistants = Collection::from(vec![make_assistant("TA1")]);
        let json = serde_json::to_value(&assistants).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["id"], "TA1");
    }

    #[test]
    fn test_generated_ids_are_prefixed_and_unique() {
        let a = generate_id("E");
        let b = generate_id("E");
        assert!(a.starts_with("E-"));
        assert_ne!(a, b);
    }
}
