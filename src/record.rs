use serde::Serialize;
use std::fmt;

/// Access level partitioning a type's member listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    /// All visibilities in the order the generator lists them.
    pub const ALL: [Visibility; 3] = [
        Visibility::Public,
        Visibility::Protected,
        Visibility::Private,
    ];

    /// The label used in table captions (`Public`, `Protected`, `Private`).
    pub fn label(self) -> &'static str {
        match self {
            Visibility::Public => "Public",
            Visibility::Protected => "Protected",
            Visibility::Private => "Private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One sequence per visibility.
///
/// All three buckets always exist, so a lookup never has to handle an absent
/// visibility.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct VisibilityMap<T> {
    public: Vec<T>,
    protected: Vec<T>,
    private: Vec<T>,
}

impl<T> Default for VisibilityMap<T> {
    fn default() -> Self {
        VisibilityMap {
            public: Vec::new(),
            protected: Vec::new(),
            private: Vec::new(),
        }
    }
}

impl<T> VisibilityMap<T> {
    /// Builds the map by calling `f` once per visibility.
    pub fn from_fn(mut f: impl FnMut(Visibility) -> Vec<T>) -> Self {
        VisibilityMap {
            public: f(Visibility::Public),
            protected: f(Visibility::Protected),
            private: f(Visibility::Private),
        }
    }

    /// Returns the entries recorded for `visibility`.
    pub fn get(&self, visibility: Visibility) -> &[T] {
        match visibility {
            Visibility::Public => &self.public,
            Visibility::Protected => &self.protected,
            Visibility::Private => &self.private,
        }
    }

    /// Iterates the buckets in `Public`, `Protected`, `Private` order.
    pub fn iter(&self) -> impl Iterator<Item = (Visibility, &[T])> {
        Visibility::ALL.into_iter().map(move |v| (v, self.get(v)))
    }

    /// Total number of entries over all visibilities.
    pub fn len(&self) -> usize {
        self.public.len() + self.protected.len() + self.private.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A data member listed in an attribute table.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize)]
pub struct MemberVariable {
    pub declared_type: String,
    pub name: String,
    /// Brief description; empty when the generator wrote none.
    pub short_description: String,
}

/// A member function listed in a function table.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize)]
pub struct MemberFunction {
    /// Return type, empty for constructors and destructors.
    pub declared_type: String,
    /// Name and parameter list as rendered.
    pub signature: String,
    pub description: String,
    /// One line per documented parameter: direction, name, explanation.
    #[serde(rename = "parameter_doc")]
    pub parameter_docs: Vec<String>,
    /// Prose return description followed by named return values, newline-joined.
    pub return_doc: String,
    /// Template parameter declaration, empty for non-template functions.
    pub template_description: String,
}

/// A nested type alias.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize)]
pub struct TypedefEntry {
    pub declaration: String,
    pub description: String,
}

/// A single enumeration value.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize)]
pub struct EnumEntry {
    pub value_name: String,
    pub description: String,
}

/// The complete description of one class or struct page.
///
/// A record is built once per page and not modified afterwards; the fields are
/// only reachable through accessors.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize)]
pub struct TypeRecord {
    name: String,
    description: String,
    variables: VisibilityMap<MemberVariable>,
    functions: VisibilityMap<MemberFunction>,
    #[serde(rename = "typedef")]
    typedefs: Vec<TypedefEntry>,
    #[serde(rename = "enum_value")]
    enum_values: Vec<EnumEntry>,
}

impl TypeRecord {
    /// Creates a new `TypeRecord`.
    ///
    /// # Arguments
    ///
    /// * `name` - The class or struct name, possibly empty for malformed pages.
    /// * `description` - Free text from the detailed description block.
    /// * `variables` - Member variables per visibility.
    /// * `functions` - Member functions per visibility.
    /// * `typedefs` - Nested type aliases in document order.
    /// * `enum_values` - Enumeration values in document order.
    pub fn new(
        name: String,
        description: String,
        variables: VisibilityMap<MemberVariable>,
        functions: VisibilityMap<MemberFunction>,
        typedefs: Vec<TypedefEntry>,
        enum_values: Vec<EnumEntry>,
    ) -> Self {
        TypeRecord {
            name,
            description,
            variables,
            functions,
            typedefs,
            enum_values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn variables(&self) -> &VisibilityMap<MemberVariable> {
        &self.variables
    }

    pub fn functions(&self) -> &VisibilityMap<MemberFunction> {
        &self.functions
    }

    pub fn typedefs(&self) -> &[TypedefEntry] {
        &self.typedefs
    }

    pub fn enum_values(&self) -> &[EnumEntry] {
        &self.enum_values
    }
}
