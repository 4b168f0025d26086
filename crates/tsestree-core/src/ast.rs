//! Output tree model.
//!
//! Every converted node is a [`Node`]: an [`AstNodeType`] discriminator, a
//! range, a location and an ordered list of named fields. Field values are
//! child nodes, arrays, or scalars, mirroring the JSON shape of ESTree.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::location::{Range, SourceLocation};

macro_rules! ast_node_types {
    ($($variant:ident),* $(,)?) => {
        /// The `type` vocabulary of the output tree.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum AstNodeType {
            $($variant,)*
            /// Generic deep copy of a native kind without a dedicated builder.
            Opaque(&'static str),
        }

        impl AstNodeType {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(AstNodeType::$variant => stringify!($variant),)*
                    AstNodeType::Opaque(name) => name,
                }
            }
        }
    };
}

ast_node_types!(
    AccessorProperty,
    ArrayExpression,
    ArrayPattern,
    ArrowFunctionExpression,
    AssignmentExpression,
    AssignmentPattern,
    AwaitExpression,
    BinaryExpression,
    BlockStatement,
    BreakStatement,
    CallExpression,
    CatchClause,
    ChainExpression,
    ClassBody,
    ClassDeclaration,
    ClassExpression,
    ConditionalExpression,
    ContinueStatement,
    DebuggerStatement,
    Decorator,
    DoWhileStatement,
    EmptyStatement,
    ExportAllDeclaration,
    ExportDefaultDeclaration,
    ExportNamedDeclaration,
    ExportSpecifier,
    ExpressionStatement,
    ForInStatement,
    ForOfStatement,
    ForStatement,
    FunctionDeclaration,
    FunctionExpression,
    Identifier,
    IfStatement,
    ImportAttribute,
    ImportDeclaration,
    ImportDefaultSpecifier,
    ImportExpression,
    ImportNamespaceSpecifier,
    ImportSpecifier,
    JSXAttribute,
    JSXClosingElement,
    JSXClosingFragment,
    JSXElement,
    JSXEmptyExpression,
    JSXExpressionContainer,
    JSXFragment,
    JSXIdentifier,
    JSXMemberExpression,
    JSXNamespacedName,
    JSXOpeningElement,
    JSXOpeningFragment,
    JSXSpreadAttribute,
    JSXSpreadChild,
    JSXText,
    LabeledStatement,
    Literal,
    LogicalExpression,
    MemberExpression,
    MetaProperty,
    MethodDefinition,
    NewExpression,
    ObjectExpression,
    ObjectPattern,
    PrivateIdentifier,
    Program,
    Property,
    PropertyDefinition,
    RestElement,
    ReturnStatement,
    SequenceExpression,
    SpreadElement,
    StaticBlock,
    Super,
    SwitchCase,
    SwitchStatement,
    TaggedTemplateExpression,
    TemplateElement,
    TemplateLiteral,
    ThisExpression,
    ThrowStatement,
    TryStatement,
    UnaryExpression,
    UpdateExpression,
    VariableDeclaration,
    VariableDeclarator,
    WhileStatement,
    WithStatement,
    YieldExpression,
    TSAbstractAccessorProperty,
    TSAbstractKeyword,
    TSAbstractMethodDefinition,
    TSAbstractPropertyDefinition,
    TSAnyKeyword,
    TSArrayType,
    TSAsExpression,
    TSAsyncKeyword,
    TSBigIntKeyword,
    TSBooleanKeyword,
    TSCallSignatureDeclaration,
    TSClassImplements,
    TSConditionalType,
    TSConstructorType,
    TSConstructSignatureDeclaration,
    TSDeclareFunction,
    TSDeclareKeyword,
    TSEmptyBodyFunctionExpression,
    TSEnumBody,
    TSEnumDeclaration,
    TSEnumMember,
    TSExportAssignment,
    TSExportKeyword,
    TSExternalModuleReference,
    TSFunctionType,
    TSImportEqualsDeclaration,
    TSImportType,
    TSIndexedAccessType,
    TSIndexSignature,
    TSInferType,
    TSInstantiationExpression,
    TSInterfaceBody,
    TSInterfaceDeclaration,
    TSInterfaceHeritage,
    TSIntersectionType,
    TSIntrinsicKeyword,
    TSLiteralType,
    TSMappedType,
    TSMethodSignature,
    TSModuleBlock,
    TSModuleDeclaration,
    TSNamedTupleMember,
    TSNamespaceExportDeclaration,
    TSNeverKeyword,
    TSNonNullExpression,
    TSNullKeyword,
    TSNumberKeyword,
    TSObjectKeyword,
    TSOptionalType,
    TSParameterProperty,
    TSPrivateKeyword,
    TSPropertySignature,
    TSProtectedKeyword,
    TSPublicKeyword,
    TSQualifiedName,
    TSReadonlyKeyword,
    TSRestType,
    TSSatisfiesExpression,
    TSStaticKeyword,
    TSStringKeyword,
    TSSymbolKeyword,
    TSTemplateLiteralType,
    TSThisType,
    TSTupleType,
    TSTypeAliasDeclaration,
    TSTypeAnnotation,
    TSTypeAssertion,
    TSTypeLiteral,
    TSTypeOperator,
    TSTypeParameter,
    TSTypeParameterDeclaration,
    TSTypeParameterInstantiation,
    TSTypePredicate,
    TSTypeQuery,
    TSTypeReference,
    TSUndefinedKeyword,
    TSUnionType,
    TSUnknownKeyword,
    TSVoidKeyword,
);

impl std::fmt::Display for AstNodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dense id of an output node, unique within one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Node(Box<Node>),
    /// Array of nodes; `Value::Null` entries are holes.
    List(Vec<Value>),
    Object(Vec<(&'static str, Value)>),
}

impl Value {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn nodes(nodes: Vec<Node>) -> Value {
        Value::List(nodes.into_iter().map(Value::from).collect())
    }

    fn for_each_node<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        match self {
            Value::Node(node) => f(node),
            Value::List(items) => items.iter().for_each(|item| item.for_each_node(f)),
            Value::Object(entries) => entries.iter().for_each(|(_, v)| v.for_each_node(f)),
            _ => {}
        }
    }

    fn for_each_node_mut(&mut self, f: &mut impl FnMut(&mut Node)) {
        match self {
            Value::Node(node) => f(node),
            Value::List(items) => items.iter_mut().for_each(|item| item.for_each_node_mut(f)),
            Value::Object(entries) => entries
                .iter_mut()
                .for_each(|(_, v)| v.for_each_node_mut(f)),
            _ => {}
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(Box::new(node))
    }
}

impl From<Option<Node>> for Value {
    fn from(node: Option<Node>) -> Self {
        node.map(Value::from).unwrap_or(Value::Null)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Node>> for Value {
    fn from(nodes: Vec<Node>) -> Self {
        Value::nodes(nodes)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub ty: AstNodeType,
    pub range: Range,
    pub loc: SourceLocation,
    fields: Vec<(&'static str, Value)>,
}

impl Node {
    pub fn new(id: NodeId, ty: AstNodeType, range: Range, loc: SourceLocation) -> Self {
        Self {
            id,
            ty,
            range,
            loc,
            fields: Vec::new(),
        }
    }

    /// Sets `key`, replacing an earlier value for the same key in place.
    pub fn set(&mut self, key: &'static str, value: impl Into<Value>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn with(mut self, key: &'static str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key` only when `value` is present; absent optional fields are
    /// omitted from the output rather than serialized as `null`.
    pub fn with_opt(mut self, key: &'static str, value: Option<Node>) -> Self {
        if let Some(node) = value {
            self.set(key, node);
        }
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self.fields.iter().position(|(k, _)| *k == key)?;
        Some(self.fields.remove(index).1)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn child(&self, key: &str) -> Option<&Node> {
        self.get(key).and_then(Value::as_node)
    }

    pub fn child_mut(&mut self, key: &str) -> Option<&mut Node> {
        match self.get_mut(key) {
            Some(Value::Node(node)) => Some(node),
            _ => None,
        }
    }

    pub fn list(&self, key: &str) -> Option<&[Value]> {
        self.get(key).and_then(Value::as_list)
    }

    /// Nodes of the array field `key`, skipping holes.
    pub fn nodes(&self, key: &str) -> Vec<&Node> {
        self.list(key)
            .map(|items| items.iter().filter_map(Value::as_node).collect())
            .unwrap_or_default()
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    /// Direct child nodes in field order.
    pub fn children(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        for (_, value) in &self.fields {
            value.for_each_node(&mut |node| out.push(node));
        }
        out
    }

    pub fn for_each_child_mut(&mut self, mut f: impl FnMut(&mut Node)) {
        for (_, value) in &mut self.fields {
            value.for_each_node_mut(&mut f);
        }
    }

    /// Pre-order traversal of this node and all descendants.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        f(self);
        for (_, value) in &self.fields {
            value.for_each_node(&mut |child| child.walk(f));
        }
    }

    pub fn descendant_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }

    /// Serializes this subtree, omitting `range`/`loc` as requested.
    pub fn to_json(&self, shape: OutputShape) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("type".into(), self.ty.as_str().into());
        for (key, value) in &self.fields {
            map.insert((*key).into(), value_to_json(value, shape));
        }
        if shape.range {
            map.insert(
                "range".into(),
                serde_json::json!([self.range.0, self.range.1]),
            );
        }
        if shape.loc {
            map.insert(
                "loc".into(),
                serde_json::to_value(self.loc).unwrap_or(serde_json::Value::Null),
            );
        }
        serde_json::Value::Object(map)
    }
}

fn value_to_json(value: &Value, shape: OutputShape) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => (*b).into(),
        Value::Number(n) => number_to_json(*n),
        Value::Str(s) => s.as_str().into(),
        Value::Node(node) => node.to_json(shape),
        Value::List(items) => items.iter().map(|v| value_to_json(v, shape)).collect(),
        Value::Object(entries) => serde_json::Value::Object(
            entries
                .iter()
                .map(|(k, v)| ((*k).to_string(), value_to_json(v, shape)))
                .collect(),
        ),
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

/// Which position fields appear in serialized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputShape {
    pub range: bool,
    pub loc: bool,
}

impl Default for OutputShape {
    fn default() -> Self {
        Self {
            range: true,
            loc: true,
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 3))?;
        map.serialize_entry("type", self.ty.as_str())?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("range", &self.range)?;
        map.serialize_entry("loc", &self.loc)?;
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => number_to_json(*n).serialize(serializer),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Node(node) => node.serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}
