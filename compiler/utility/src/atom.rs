//! Interned strings.

use crate::HashMap;
use std::{
    fmt,
    sync::{LazyLock, Mutex},
};

/// An interned string.
///
/// Equality and hashing are index-based and thus cheap. Atoms are never
/// deallocated for the lifetime of the process which is fine for a
/// batch compiler.
//
// Ordering impls for Atom would be a pitfall:
//
// * comparison by index would be fast but highly unintuitive and in most cases not what
//   the user wants,
// * comparison by string would be rather slow and the user should explicitly opt in
//   via `Atom::to_str`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Atom(u32);

impl Atom {
    pub fn to_str(self) -> &'static str {
        Interner::the().lock().unwrap().get(self)
    }
}

impl From<&str> for Atom {
    fn from(value: &str) -> Self {
        Interner::the().lock().unwrap().intern_borrowed(value)
    }
}

impl From<String> for Atom {
    fn from(value: String) -> Self {
        Interner::the().lock().unwrap().intern_owned(value)
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

struct Interner {
    atoms: HashMap<&'static str, Atom>,
    strings: Vec<&'static str>,
}

impl Interner {
    fn the() -> &'static Mutex<Self> {
        static SELF: LazyLock<Mutex<Interner>> = LazyLock::new(|| Mutex::new(Interner::new()));

        &SELF
    }

    fn with(values: Vec<&'static str>) -> Self {
        Self {
            atoms: values
                .iter()
                .zip(0..)
                .map(|(&string, atom)| (string, Atom(atom)))
                .collect(),
            strings: values,
        }
    }

    fn intern_borrowed(&mut self, value: &str) -> Atom {
        if let Some(&atom) = self.atoms.get(value) {
            return atom;
        }

        self.insert(Box::leak(Box::from(value)))
    }

    fn intern_owned(&mut self, value: String) -> Atom {
        if let Some(&atom) = self.atoms.get(&*value) {
            return atom;
        }

        self.insert(String::leak(value))
    }

    fn insert(&mut self, value: &'static str) -> Atom {
        let atom = Atom(self.strings.len().try_into().unwrap());
        self.strings.push(value);
        self.atoms.insert(value, atom);
        atom
    }

    fn get(&self, atom: Atom) -> &'static str {
        self.strings[atom.0 as usize]
    }
}

macro_rules! atoms {
    ($( $atom:ident => $string:literal at $index:literal ),* $(,)?) => {
        impl Atom {
            $( pub const $atom: Self = Self($index); )*
        }

        impl Interner {
            fn new() -> Self {
                Self::with(vec![$( $string ),*])
            }
        }
    };
}

atoms! {
    VOID => "Void" at 0,
    INT => "Int" at 1,
    MAIN => "main" at 2,
    PRINT_INT => "print_int" at 3,
}

#[cfg(test)]
mod test {
    use super::Atom;

    #[test]
    fn predefined_atoms_resolve() {
        assert_eq!(Atom::VOID.to_str(), "Void");
        assert_eq!(Atom::INT.to_str(), "Int");
        assert_eq!(Atom::MAIN.to_str(), "main");
        assert_eq!(Atom::PRINT_INT.to_str(), "print_int");
    }

    #[test]
    fn interning_is_idempotent() {
        assert_eq!(Atom::from("swap"), Atom::from("swap".to_owned()));
        assert_eq!(Atom::from("main"), Atom::MAIN);
        assert_ne!(Atom::from("swap"), Atom::from("swaps"));
    }
}
