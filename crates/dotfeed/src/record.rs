//! Capability traits the mapper uses to walk a destination record.
//!
//! The mapper never inspects types directly. A record describes itself
//! through [`Record::fields`], which lists each field together with what the
//! mapper may do with it:
//!
//! - a **tagged** field names the key that feeds it and exposes a
//!   type-erased setter ([`Assign`]);
//! - a **nested** field exposes a [`Target`], which may or may not turn out
//!   to be a record when visited.
//!
//! `#[derive(Record)]` generates both impls for a struct. They can also be
//! written by hand:
//!
//! ```rust,ignore
//! struct Server {
//!     port: u16,
//!     tls: TlsConfig,
//! }
//!
//! impl Record for Server {
//!     fn fields(&mut self) -> Vec<Field<'_>> {
//!         vec![
//!             Field::tagged("port", "PORT", false, None, &mut self.port),
//!             Field::nested("tls", None, &mut self.tls),
//!         ]
//!     }
//! }
//!
//! impl Target for Server {
//!     fn with_record(&mut self, visit: &mut Visit<'_>) -> Result<bool, Error> {
//!         visit(self)?;
//!         Ok(true)
//!     }
//! }
//! ```

use std::cell::RefCell;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::coerce::{Coerce, CoerceError};
use crate::error::Error;

/// Callback handed to [`Target::with_record`].
pub type Visit<'v> = dyn FnMut(&mut dyn Record) -> Result<(), Error> + 'v;

/// Type-erased read/write access to a tagged field.
///
/// Every [`Coerce`] type is `Assign`, so derived code can hand out
/// `&mut dyn Assign` for any supported field.
pub trait Assign {
    /// Coerces `raw` and overwrites the field.
    ///
    /// # Errors
    ///
    /// Returns the coercion failure; the field is left unchanged.
    fn assign(&mut self, raw: &str) -> Result<(), CoerceError>;

    /// The field's current value in dotenv value syntax.
    fn current(&self) -> String;

    /// Name of the field's type, for messages.
    fn expected_type(&self) -> &'static str;
}

impl<T: Coerce> Assign for T {
    fn assign(&mut self, raw: &str) -> Result<(), CoerceError> {
        *self = T::coerce(raw)?;
        Ok(())
    }

    fn current(&self) -> String {
        self.render()
    }

    fn expected_type(&self) -> &'static str {
        T::TYPE_NAME
    }
}

/// A record: a value made of named fields.
pub trait Record {
    /// Lists the record's fields in declaration order.
    ///
    /// Fields excluded from feeding (`#[dotenv(skip)]`) are not listed.
    fn fields(&mut self) -> Vec<Field<'_>>;
}

/// A value the mapper may be pointed at.
///
/// Leaf types report that they are not records. Records report that they
/// are and hand themselves to the visitor. Owning and shared pointers
/// delegate to what they point at, so a `None` or an already-borrowed
/// `RefCell` is never followed.
pub trait Target {
    /// Visits the record behind `self`.
    ///
    /// Returns `Ok(true)` if `visit` was called, `Ok(false)` if `self` is not
    /// (or does not currently hold) a record.
    ///
    /// # Errors
    ///
    /// Propagates errors returned by `visit`.
    fn with_record(&mut self, visit: &mut Visit<'_>) -> Result<bool, Error> {
        let _ = visit;
        Ok(false)
    }

    /// Type name used in [`Error::InvalidTarget`].
    fn target_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// One field of a [`Record`].
pub struct Field<'a> {
    /// The field's Rust name.
    pub name: &'static str,

    /// The field's doc comment, if any.
    pub doc: Option<&'static str>,

    /// What the mapper may do with the field.
    pub kind: FieldKind<'a>,
}

/// How a field participates in feeding.
pub enum FieldKind<'a> {
    /// Fed from a single key.
    Tagged(Tag<'a>),

    /// Possibly a nested record, fed from the same mapping.
    Nested(&'a mut dyn Target),
}

/// The key that feeds a tagged field, and a setter for it.
pub struct Tag<'a> {
    /// The key looked up in the parse result.
    pub key: &'static str,

    /// Redact the value in errors and templates.
    pub secret: bool,

    /// Setter for the field.
    pub slot: &'a mut dyn Assign,
}

impl<'a> Field<'a> {
    /// A field fed from `key`.
    pub fn tagged(
        name: &'static str,
        key: &'static str,
        secret: bool,
        doc: Option<&'static str>,
        slot: &'a mut dyn Assign,
    ) -> Self {
        Self {
            name,
            doc,
            kind: FieldKind::Tagged(Tag { key, secret, slot }),
        }
    }

    /// An untagged field the mapper recurses into when it holds a record.
    pub fn nested(name: &'static str, doc: Option<&'static str>, target: &'a mut dyn Target) -> Self {
        Self {
            name,
            doc,
            kind: FieldKind::Nested(target),
        }
    }
}

/// Implements [`Target`] for leaf types, which are never records.
macro_rules! leaf_target {
    ($($t:ty),+ $(,)?) => {
        $(
            impl Target for $t {}
        )+
    };
}

leaf_target!(
    String, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    PathBuf, IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr,
);

impl<T> Target for Vec<T> {}

#[cfg(feature = "serde")]
impl<T> Target for crate::coerce::Json<T> {}

#[cfg(feature = "secrecy")]
impl Target for secrecy::SecretString {}

impl<T: Target> Target for Option<T> {
    fn with_record(&mut self, visit: &mut Visit<'_>) -> Result<bool, Error> {
        match self {
            Some(inner) => inner.with_record(visit),
            None => Ok(false),
        }
    }
}

impl<T: Target + ?Sized> Target for Box<T> {
    fn with_record(&mut self, visit: &mut Visit<'_>) -> Result<bool, Error> {
        (**self).with_record(visit)
    }
}

impl<T: Target> Target for Rc<RefCell<T>> {
    fn with_record(&mut self, visit: &mut Visit<'_>) -> Result<bool, Error> {
        let mut inner = self
            .try_borrow_mut()
            .map_err(|_| Error::invalid_target(std::any::type_name::<Self>()))?;
        inner.with_record(visit)
    }
}

impl<T: Target> Target for Arc<Mutex<T>> {
    fn with_record(&mut self, visit: &mut Visit<'_>) -> Result<bool, Error> {
        self.lock().with_record(visit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Inner {
        port: u16,
    }

    impl Record for Inner {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![Field::tagged("port", "PORT", false, None, &mut self.port)]
        }
    }

    impl Target for Inner {
        fn with_record(&mut self, visit: &mut Visit<'_>) -> Result<bool, Error> {
            visit(self)?;
            Ok(true)
        }
    }

    fn count_visits(target: &mut dyn Target) -> (bool, usize) {
        let mut visits = 0;
        let fed = target
            .with_record(&mut |_record: &mut dyn Record| {
                visits += 1;
                Ok::<(), Error>(())
            })
            .unwrap();
        (fed, visits)
    }

    #[test]
    fn test_assign_through_trait_object() {
        let mut port = 0u16;
        let slot: &mut dyn Assign = &mut port;
        slot.assign("8080").unwrap();
        assert_eq!(slot.current(), "8080");
        assert_eq!(slot.expected_type(), "u16");
        assert!(slot.assign("nope").is_err());
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_leaf_is_not_a_record() {
        assert_eq!(count_visits(&mut 5u32), (false, 0));
        assert_eq!(count_visits(&mut String::new()), (false, 0));
        assert_eq!(count_visits(&mut vec![1u8]), (false, 0));
    }

    #[test]
    fn test_pointers_delegate() {
        assert_eq!(count_visits(&mut Inner { port: 1 }), (true, 1));
        assert_eq!(count_visits(&mut Box::new(Inner { port: 1 })), (true, 1));
        assert_eq!(count_visits(&mut Some(Inner { port: 1 })), (true, 1));
        assert_eq!(count_visits(&mut None::<Inner>), (false, 0));
        assert_eq!(
            count_visits(&mut Rc::new(RefCell::new(Inner { port: 1 }))),
            (true, 1)
        );
        assert_eq!(
            count_visits(&mut Arc::new(Mutex::new(Inner { port: 1 }))),
            (true, 1)
        );
    }

    #[test]
    fn test_borrowed_refcell_is_rejected() {
        let mut shared = Rc::new(RefCell::new(Inner { port: 1 }));
        let alias = Rc::clone(&shared);
        let _guard = alias.borrow();

        let err = shared
            .with_record(&mut |_record: &mut dyn Record| Ok::<(), Error>(()))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTarget { .. }));
    }

    #[test]
    fn test_target_name() {
        assert_eq!(5u8.target_name(), "u8");
    }
}
