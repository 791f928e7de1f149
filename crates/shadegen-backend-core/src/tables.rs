//! Per-backend lookup tables: types, identifiers, and intrinsics.
//!
//! Tables are built once when a backend is constructed and are read-only
//! afterwards, so lookups are safe from any thread.

use std::collections::{HashMap, HashSet};

use shadegen_ir::{ShaderResourceKind, known};

/// Canonical host type name to target type token.
#[derive(Clone, Debug, Default)]
pub struct TypeTable {
    map: HashMap<&'static str, &'static str>,
}

impl TypeTable {
    /// Builds a table from `(canonical, target)` pairs.
    pub fn new(entries: &[(&'static str, &'static str)]) -> Self {
        Self {
            map: entries.iter().copied().collect(),
        }
    }

    /// Looks up the target spelling of a canonical type name.
    pub fn get(&self, canonical: &str) -> Option<&'static str> {
        self.map.get(canonical).copied()
    }
}

/// Maps vector component members (`X`, `Y`, `Z`, `W`) to target swizzle letters.
#[derive(Clone, Debug)]
pub struct SwizzleTable {
    components: [(char, char); 4],
}

impl SwizzleTable {
    /// A table for targets whose components are spelled `x`, `y`, `z`, `w`.
    pub fn xyzw() -> Self {
        Self {
            components: [('X', 'x'), ('Y', 'y'), ('Z', 'z'), ('W', 'w')],
        }
    }

    /// Lowers `member` on a vector of `width` components, or `None` if it is
    /// not a swizzle of that vector.
    pub fn lower(&self, member: &str, width: usize) -> Option<String> {
        if member.is_empty() || member.len() > 4 {
            return None;
        }
        member
            .chars()
            .map(|c| {
                self.components[..width]
                    .iter()
                    .find(|(host, _)| *host == c)
                    .map(|(_, target)| *target)
            })
            .collect()
    }
}

/// Member and static-member spellings plus the reserved-word set of a backend.
#[derive(Clone, Debug)]
pub struct IdentifierTable {
    members: HashMap<&'static str, HashMap<&'static str, &'static str>>,
    statics: HashMap<&'static str, HashMap<&'static str, &'static str>>,
    swizzle: SwizzleTable,
    reserved: HashSet<&'static str>,
}

impl IdentifierTable {
    /// An empty table lowering vector members through `swizzle`.
    pub fn new(swizzle: SwizzleTable) -> Self {
        Self {
            members: HashMap::new(),
            statics: HashMap::new(),
            swizzle,
            reserved: HashSet::new(),
        }
    }

    /// Adds words that user identifiers must not collide with.
    pub fn with_reserved(mut self, words: &[&'static str]) -> Self {
        self.reserved.extend(words.iter().copied());
        self
    }

    /// Adds an explicit instance member spelling.
    pub fn with_member(mut self, ty: &'static str, member: &'static str, target: &'static str) -> Self {
        self.members.entry(ty).or_default().insert(member, target);
        self
    }

    /// Adds a static member (`Vector4.Zero`, `MathF.PI`) with its full target expression.
    pub fn with_static(mut self, ty: &'static str, member: &'static str, target: &'static str) -> Self {
        self.statics.entry(ty).or_default().insert(member, target);
        self
    }

    /// Lowers an instance member of a known type: explicit entries first,
    /// then swizzles of the known vector types.
    pub fn member(&self, declaring_type: &str, member: &str) -> Option<String> {
        if let Some(target) = self.members.get(declaring_type).and_then(|m| m.get(member)) {
            return Some((*target).to_owned());
        }
        let width = known::vector_width(declaring_type)?;
        self.swizzle.lower(member, width)
    }

    /// The target expression of a static member, if mapped.
    pub fn static_member(&self, ty: &str, member: &str) -> Option<&'static str> {
        self.statics.get(ty)?.get(member).copied()
    }

    /// Whether members of `ty` are lowered through this table rather than
    /// as structure fields.
    pub fn knows_type(&self, ty: &str) -> bool {
        known::vector_width(ty).is_some() || self.members.contains_key(ty)
    }

    /// Whether `identifier` is a reserved word of the target.
    pub fn is_reserved(&self, identifier: &str) -> bool {
        self.reserved.contains(identifier)
    }

    /// Appends `_` to identifiers that collide with a reserved word.
    ///
    /// A reserved word followed by underscores gets one more, so `input_`
    /// stays distinct from the corrected `input`.
    pub fn correct(&self, identifier: &str) -> String {
        if self.is_reserved(identifier.trim_end_matches('_')) {
            format!("{identifier}_")
        } else {
            identifier.to_owned()
        }
    }
}

/// A lowered call argument.
#[derive(Clone, Debug, PartialEq)]
pub struct IntrinsicArgument {
    /// Lowered argument text.
    pub text: String,
    /// Whether `text` needs parentheses when used as an operator operand.
    pub compound: bool,
    /// Set when the argument is a direct reference to a module resource.
    pub resource: Option<ShaderResourceKind>,
}

/// How a host intrinsic is written in the target language.
#[derive(Clone, Copy, Debug)]
pub enum Intrinsic {
    /// A target function taking the same arguments in the same order.
    Rename(&'static str),
    /// Anything else; `None` when the arguments cannot be expressed.
    Custom(fn(&[IntrinsicArgument]) -> Option<String>),
}

impl IntrinsicArgument {
    /// The argument as an operator operand.
    pub fn operand(&self) -> String {
        if self.compound {
            format!("({})", self.text)
        } else {
            self.text.clone()
        }
    }
}

impl Intrinsic {
    /// Lowers a call, or `None` if the arguments do not fit.
    pub fn apply(&self, args: &[IntrinsicArgument]) -> Option<String> {
        match self {
            Self::Rename(name) => {
                let args: Vec<_> = args.iter().map(|a| a.text.as_str()).collect();
                Some(format!("{name}({})", args.join(", ")))
            }
            Self::Custom(f) => f(args),
        }
    }
}

/// Intrinsics keyed by fully qualified host method name (`System.MathF.Sin`).
#[derive(Clone, Debug, Default)]
pub struct IntrinsicTable {
    map: HashMap<String, Intrinsic>,
}

impl IntrinsicTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an intrinsic under its fully qualified name.
    pub fn insert(&mut self, name: impl Into<String>, intrinsic: Intrinsic) {
        self.map.insert(name.into(), intrinsic);
    }

    /// Registers `method` on every known vector type.
    pub fn insert_vector(&mut self, method: &str, intrinsic: Intrinsic) {
        for ty in [known::VECTOR2, known::VECTOR3, known::VECTOR4] {
            self.insert(format!("{ty}.{method}"), intrinsic);
        }
    }

    /// Registers a `System.MathF` method.
    pub fn insert_math(&mut self, method: &str, intrinsic: Intrinsic) {
        self.insert(format!("{}.{method}", known::MATHF), intrinsic);
    }

    /// Registers a shader builtin.
    pub fn insert_builtin(&mut self, method: &str, intrinsic: Intrinsic) {
        self.insert(format!("{}.{method}", known::SHADER_BUILTINS), intrinsic);
    }

    /// Looks up an intrinsic by fully qualified name.
    pub fn get(&self, name: &str) -> Option<&Intrinsic> {
        self.map.get(name)
    }
}
