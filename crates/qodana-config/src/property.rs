//! Overridable properties with lazily computed conventions.
//!
//! A [`Property`] resolves to its explicit value when one was set, otherwise
//! to whatever its convention [`Provider`] produces, otherwise to nothing.
//! Conventions are closures and are re-evaluated on every read, so a value
//! derived from another property always reflects the latest assignment.
//!
//! Properties are shared handles: cloning one yields another view of the
//! same slot. Cross-task conventions are built by handing a property's
//! [`Property::provider`] to another property at wiring time.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use qodana_common::error::{QodanaError, Result};

/// A lazily evaluated, possibly absent value.
pub struct Provider<T> {
    produce: Rc<dyn Fn() -> Option<T>>,
}

impl<T: 'static> Provider<T> {
    /// Creates a provider from a closure.
    pub fn from_fn(produce: impl Fn() -> Option<T> + 'static) -> Self {
        Self {
            produce: Rc::new(produce),
        }
    }

    /// A provider that never produces a value.
    #[must_use]
    pub fn absent() -> Self {
        Self::from_fn(|| None)
    }

    /// Evaluates the provider.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        (self.produce)()
    }

    /// Returns a provider applying `f` to this provider's value.
    #[must_use]
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Provider<U> {
        Provider::from_fn(move || self.get().map(&f))
    }
}

impl<T: Clone + 'static> Provider<T> {
    /// A provider that always produces `value`.
    #[must_use]
    pub fn value(value: T) -> Self {
        Self::from_fn(move || Some(value.clone()))
    }
}

impl<T> Clone for Provider<T> {
    fn clone(&self) -> Self {
        Self {
            produce: Rc::clone(&self.produce),
        }
    }
}

impl<T> fmt::Debug for Provider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Provider(..)")
    }
}

struct Slot<T> {
    explicit: Option<T>,
    convention: Provider<T>,
}

/// A named, overridable setting.
pub struct Property<T> {
    name: &'static str,
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T: Clone + 'static> Property<T> {
    /// Creates a property with no value and no convention.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slot: Rc::new(RefCell::new(Slot {
                explicit: None,
                convention: Provider::absent(),
            })),
        }
    }

    /// Creates a property whose convention is a fixed value.
    #[must_use]
    pub fn with_convention(name: &'static str, value: T) -> Self {
        let property = Self::new(name);
        property.convention_value(value);
        property
    }

    /// Name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Sets the explicit value. Later calls win.
    pub fn set(&self, value: T) {
        self.slot.borrow_mut().explicit = Some(value);
    }

    /// Sets the explicit value when `value` is `Some`, leaves it untouched otherwise.
    pub fn set_if_some(&self, value: Option<T>) {
        if let Some(value) = value {
            self.set(value);
        }
    }

    /// Clears the explicit value so the convention applies again.
    pub fn unset(&self) {
        self.slot.borrow_mut().explicit = None;
    }

    /// Replaces the convention.
    pub fn set_convention(&self, convention: Provider<T>) {
        self.slot.borrow_mut().convention = convention;
    }

    /// Replaces the convention with a fixed value.
    pub fn convention_value(&self, value: T) {
        self.set_convention(Provider::value(value));
    }

    /// Whether an explicit value has been assigned.
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        self.slot.borrow().explicit.is_some()
    }

    /// Resolves the property: explicit value, else convention, else `None`.
    #[must_use]
    pub fn get_or_none(&self) -> Option<T> {
        // The convention may read other properties, so release the borrow first.
        let (explicit, convention) = {
            let slot = self.slot.borrow();
            (slot.explicit.clone(), slot.convention.clone())
        };
        explicit.or_else(|| convention.get())
    }

    /// Resolves a required property.
    ///
    /// # Errors
    ///
    /// Returns [`QodanaError::Missing`] if neither an explicit value nor a
    /// convention produces one.
    pub fn get(&self) -> Result<T> {
        self.get_or_none().ok_or(QodanaError::Missing {
            property: self.name,
        })
    }

    /// Resolves the property, falling back to `default`.
    #[must_use]
    pub fn get_or_else(&self, default: T) -> T {
        self.get_or_none().unwrap_or(default)
    }

    /// A provider reading this property lazily.
    #[must_use]
    pub fn provider(&self) -> Provider<T> {
        let this = self.clone();
        Provider::from_fn(move || this.get_or_none())
    }
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.borrow();
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("explicit", &slot.explicit)
            .finish_non_exhaustive()
    }
}
