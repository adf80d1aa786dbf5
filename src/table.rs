use crate::value::{ObjString, Value};

use std::rc::Rc;

const MAX_LOAD: f64 = 0.75;

#[derive(Debug, Clone)]
enum Slot {
  Empty,
  Tombstone,
  Occupied(Rc<ObjString>, Value),
}

/// Open addressing with linear probing over a power-of-two slot array.
/// Keys are interned strings, so probing compares by pointer; tombstones
/// keep probe sequences intact after deletion.
pub struct Table {
  // occupied slots plus tombstones, the figure the load factor is judged on
  count: usize,
  slots: Vec<Slot>,
}

impl Table {
  pub fn new() -> Self {
    Self {
      count: 0,
      slots: Vec::new(),
    }
  }

  pub fn get(&self, key: &Rc<ObjString>) -> Option<&Value> {
    if self.slots.is_empty() {
      return None;
    }

    let mut index = key.hash() as usize & (self.slots.len() - 1);
    loop {
      match &self.slots[index] {
        Slot::Empty => return None,
        Slot::Tombstone => {}
        Slot::Occupied(existing, value) => {
          if Rc::ptr_eq(existing, key) {
            return Some(value);
          }
        }
      }
      index = (index + 1) & (self.slots.len() - 1);
    }
  }

  pub fn set(&mut self, key: Rc<ObjString>, value: Value) -> bool {
    if (self.count + 1) as f64 > self.slots.len() as f64 * MAX_LOAD {
      self.grow();
    }

    let index = self.find_slot(&key);
    let is_new = match self.slots[index] {
      Slot::Empty => {
        self.count += 1;
        true
      }
      Slot::Tombstone => true,
      Slot::Occupied(..) => false,
    };

    self.slots[index] = Slot::Occupied(key, value);
    is_new
  }

  pub fn delete(&mut self, key: &Rc<ObjString>) -> bool {
    if self.slots.is_empty() {
      return false;
    }

    let index = self.find_slot(key);
    match self.slots[index] {
      Slot::Occupied(..) => {
        self.slots[index] = Slot::Tombstone;
        true
      }
      _ => false,
    }
  }

  /// Content-based lookup for the interning path, where the candidate
  /// string is not an interned key yet.
  pub fn find_string(&self, chars: &str, hash: u32) -> Option<Rc<ObjString>> {
    if self.slots.is_empty() {
      return None;
    }

    let mut index = hash as usize & (self.slots.len() - 1);
    loop {
      match &self.slots[index] {
        Slot::Empty => return None,
        Slot::Tombstone => {}
        Slot::Occupied(existing, _) => {
          if existing.hash() == hash && existing.as_str() == chars {
            return Some(existing.clone());
          }
        }
      }
      index = (index + 1) & (self.slots.len() - 1);
    }
  }

  fn find_slot(&self, key: &Rc<ObjString>) -> usize {
    let mut index = key.hash() as usize & (self.slots.len() - 1);
    let mut tombstone = None;

    loop {
      match &self.slots[index] {
        Slot::Empty => return tombstone.unwrap_or(index),
        Slot::Tombstone => {
          if tombstone.is_none() {
            tombstone = Some(index);
          }
        }
        Slot::Occupied(existing, _) => {
          if Rc::ptr_eq(existing, key) {
            return index;
          }
        }
      }
      index = (index + 1) & (self.slots.len() - 1);
    }
  }

  fn grow(&mut self) {
    let capacity = if self.slots.len() < 8 {
      8
    } else {
      self.slots.len() * 2
    };

    let old_slots = std::mem::replace(&mut self.slots, vec![Slot::Empty; capacity]);
    self.count = 0;

    for slot in old_slots {
      if let Slot::Occupied(key, value) = slot {
        let index = self.find_slot(&key);
        self.slots[index] = Slot::Occupied(key, value);
        self.count += 1;
      }
    }
  }
}

impl Default for Table {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::value::Interner;

  #[test]
  fn set_get_and_overwrite() {
    let mut strings = Interner::new();
    let mut table = Table::new();
    let key = strings.intern("answer");

    assert!(table.set(key.clone(), Value::Number(42.0)));
    assert!(matches!(table.get(&key), Some(Value::Number(value)) if *value == 42.0));

    assert!(!table.set(key.clone(), Value::Number(43.0)));
    assert!(matches!(table.get(&key), Some(Value::Number(value)) if *value == 43.0));
  }

  #[test]
  fn missing_keys_are_absent() {
    let mut strings = Interner::new();
    let mut table = Table::new();
    let present = strings.intern("present");
    let missing = strings.intern("missing");

    table.set(present, Value::Nil);
    assert!(table.get(&missing).is_none());
  }

  #[test]
  fn delete_leaves_other_entries_reachable() {
    let mut strings = Interner::new();
    let mut table = Table::new();

    let keys: Vec<_> = (0..32)
      .map(|i| strings.intern(&format!("key{}", i)))
      .collect();
    for (i, key) in keys.iter().enumerate() {
      table.set(key.clone(), Value::Number(i as f64));
    }

    for key in keys.iter().step_by(2) {
      assert!(table.delete(key));
    }

    for (i, key) in keys.iter().enumerate() {
      if i % 2 == 0 {
        assert!(table.get(key).is_none());
      } else {
        assert!(matches!(table.get(key), Some(Value::Number(value)) if *value == i as f64));
      }
    }
  }

  #[test]
  fn deleted_slots_are_reused() {
    let mut strings = Interner::new();
    let mut table = Table::new();
    let key = strings.intern("revenant");

    table.set(key.clone(), Value::Number(1.0));
    assert!(table.delete(&key));
    assert!(table.get(&key).is_none());

    assert!(table.set(key.clone(), Value::Number(2.0)));
    assert!(matches!(table.get(&key), Some(Value::Number(value)) if *value == 2.0));
  }

  #[test]
  fn delete_of_missing_key_reports_false() {
    let mut strings = Interner::new();
    let mut table = Table::new();
    let key = strings.intern("ghost");

    assert!(!table.delete(&key));
    table.set(strings.intern("other"), Value::Nil);
    assert!(!table.delete(&key));
  }

  #[test]
  fn survives_growth_past_load_factor() {
    let mut strings = Interner::new();
    let mut table = Table::new();

    let keys: Vec<_> = (0..100)
      .map(|i| strings.intern(&format!("entry{}", i)))
      .collect();
    for (i, key) in keys.iter().enumerate() {
      table.set(key.clone(), Value::Number(i as f64));
    }

    for (i, key) in keys.iter().enumerate() {
      assert!(matches!(table.get(key), Some(Value::Number(value)) if *value == i as f64));
    }
  }
}
