//! Resolved type definitions and the type registry.
//!
//! Types are arena-allocated; a [`TypeId`] is the canonical identity of a
//! resolved type. Two references denote the same type exactly when their ids
//! are equal, regardless of how the type was spelled at the reference site.

use std::collections::{HashMap, HashSet};

use id_arena::{Arena, Id};

pub type TypeId = Id<TypeDef>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    Array,
}

/// Invocation signature of a delegate type.
#[derive(Debug, Clone)]
pub struct DelegateSignature {
    pub params: Vec<Option<TypeId>>,
    /// `None` means the delegate returns no value.
    pub returns: Option<TypeId>,
}

#[derive(Debug)]
pub struct TypeDef {
    pub name: String,
    pub qualified_name: String,
    pub kind: TypeKind,
    pub base: Option<TypeId>,
    pub interfaces: Vec<TypeId>,
    /// Element type for arrays.
    pub element: Option<TypeId>,
    /// Invoke signature for delegates.
    pub invoke: Option<DelegateSignature>,
    /// Lexically enclosing type for nested type declarations.
    pub containing_type: Option<TypeId>,
    /// Attribute names as written at the declaration (e.g. `TestClass`).
    pub attributes: Vec<String>,
}

impl TypeDef {
    pub fn new(kind: TypeKind, name: &str, qualified_name: &str) -> Self {
        Self {
            name: name.to_string(),
            qualified_name: qualified_name.to_string(),
            kind,
            base: None,
            interfaces: Vec::new(),
            element: None,
            invoke: None,
            containing_type: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_base(mut self, base: TypeId) -> Self {
        self.base = Some(base);
        self
    }

    pub fn with_interface(mut self, interface: TypeId) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_invoke(mut self, signature: DelegateSignature) -> Self {
        self.invoke = Some(signature);
        self
    }

    pub fn with_element(mut self, element: TypeId) -> Self {
        self.element = Some(element);
        self
    }

    pub fn nested_in(mut self, outer: TypeId) -> Self {
        self.containing_type = Some(outer);
        self
    }

    pub fn with_attribute(mut self, attribute: &str) -> Self {
        self.attributes.push(attribute.to_string());
        self
    }
}

pub struct TypeRegistry {
    arena: Arena<TypeDef>,
    by_qualified: HashMap<String, TypeId>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            by_qualified: HashMap::new(),
        }
    }

    pub fn declare(&mut self, def: TypeDef) -> TypeId {
        let qualified = def.qualified_name.clone();
        let id = self.arena.alloc(def);
        self.by_qualified.insert(qualified, id);
        id
    }

    pub fn get(&self, id: TypeId) -> &TypeDef {
        &self.arena[id]
    }

    pub fn by_qualified_name(&self, qualified_name: &str) -> Option<TypeId> {
        self.by_qualified.get(qualified_name).copied()
    }

    pub fn is_array(&self, id: TypeId) -> bool {
        self.arena[id].kind == TypeKind::Array
    }

    /// Walks the base-type chain of `ty`, excluding `ty` itself.
    ///
    /// The walk is bounded by a visited set; the hierarchy is acyclic in
    /// practice but a malformed model must not hang the analysis.
    pub fn derives_from(&self, ty: TypeId, ancestor: TypeId) -> bool {
        let mut seen = HashSet::new();
        let mut current = self.arena[ty].base;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            if !seen.insert(id) {
                break;
            }
            current = self.arena[id].base;
        }
        false
    }

    pub fn is_or_derives_from(&self, ty: TypeId, ancestor: TypeId) -> bool {
        ty == ancestor || self.derives_from(ty, ancestor)
    }

    /// True when `ty` is `interface`, or reaches it through its base chain
    /// and transitive interface lists.
    pub fn implements(&self, ty: TypeId, interface: TypeId) -> bool {
        let mut seen = HashSet::new();
        let mut queue = vec![ty];
        while let Some(id) = queue.pop() {
            if !seen.insert(id) {
                continue;
            }
            if id == interface {
                return true;
            }
            let def = &self.arena[id];
            if let Some(base) = def.base {
                queue.push(base);
            }
            queue.extend(def.interfaces.iter().copied());
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_qualified_name() {
        let mut types = TypeRegistry::new();
        let object = types.declare(TypeDef::new(TypeKind::Class, "Object", "System.Object"));

        assert_eq!(types.by_qualified_name("System.Object"), Some(object));
        assert_eq!(types.by_qualified_name("System.Missing"), None);
    }

    #[test]
    fn identity_distinguishes_same_named_types() {
        let mut types = TypeRegistry::new();
        let system_console =
            types.declare(TypeDef::new(TypeKind::Class, "Console", "System.Console"));
        let user_console = types.declare(TypeDef::new(TypeKind::Class, "Console", "App.Console"));

        assert_ne!(system_console, user_console);
        assert_eq!(
            types.get(system_console).name,
            types.get(user_console).name
        );
    }

    #[test]
    fn derives_from_walks_base_chain() {
        let mut types = TypeRegistry::new();
        let object = types.declare(TypeDef::new(TypeKind::Class, "Object", "System.Object"));
        let exception = types.declare(
            TypeDef::new(TypeKind::Class, "Exception", "System.Exception").with_base(object),
        );
        let oce = types.declare(
            TypeDef::new(
                TypeKind::Class,
                "OperationCanceledException",
                "System.OperationCanceledException",
            )
            .with_base(exception),
        );
        let tce = types.declare(
            TypeDef::new(
                TypeKind::Class,
                "TaskCanceledException",
                "System.Threading.Tasks.TaskCanceledException",
            )
            .with_base(oce),
        );

        assert!(types.derives_from(tce, oce));
        assert!(types.derives_from(tce, object));
        assert!(!types.derives_from(oce, tce));
        assert!(!types.derives_from(oce, oce), "strict walk excludes self");
        assert!(types.is_or_derives_from(oce, oce));
    }

    #[test]
    fn derives_from_survives_a_cyclic_model() {
        let mut types = TypeRegistry::new();
        let a = types.declare(TypeDef::new(TypeKind::Class, "A", "App.A"));
        let b = types.declare(TypeDef::new(TypeKind::Class, "B", "App.B").with_base(a));
        // Malformed input: close the loop.
        types.arena[a].base = Some(b);

        let unrelated = types.declare(TypeDef::new(TypeKind::Class, "C", "App.C"));
        assert!(!types.derives_from(a, unrelated));
    }

    #[test]
    fn implements_reaches_transitive_interfaces() {
        let mut types = TypeRegistry::new();
        let enumerable = types.declare(TypeDef::new(
            TypeKind::Interface,
            "IEnumerable`1",
            "System.Collections.Generic.IEnumerable`1",
        ));
        let collection = types.declare(
            TypeDef::new(
                TypeKind::Interface,
                "ICollection`1",
                "System.Collections.Generic.ICollection`1",
            )
            .with_interface(enumerable),
        );
        let list = types.declare(
            TypeDef::new(TypeKind::Class, "List`1", "System.Collections.Generic.List`1")
                .with_interface(collection),
        );
        let sub = types.declare(
            TypeDef::new(TypeKind::Class, "NameList", "App.NameList").with_base(list),
        );

        assert!(types.implements(list, enumerable));
        assert!(types.implements(sub, enumerable), "inherited via base chain");
        assert!(types.implements(enumerable, enumerable));

        let plain = types.declare(TypeDef::new(TypeKind::Class, "Plain", "App.Plain"));
        assert!(!types.implements(plain, enumerable));
    }

    #[test]
    fn array_kind_is_recognized() {
        let mut types = TypeRegistry::new();
        let string = types.declare(TypeDef::new(TypeKind::Class, "String", "System.String"));
        let array = types.declare(
            TypeDef::new(TypeKind::Array, "String[]", "System.String[]").with_element(string),
        );

        assert!(types.is_array(array));
        assert!(!types.is_array(string));
        assert_eq!(types.get(array).element, Some(string));
    }
}
