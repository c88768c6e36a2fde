//! The AST: a tagged-variant tree over ~30 node kinds grouped into four
//! categories (`spec.md` §3). Nodes are addressed by the shared
//! [`NodeId`] arena index rather than owned by pointers, so later passes
//! can decorate a node in place without invalidating ids held elsewhere
//! (e.g. a `TypePendingResolution` entry's target slot, or a symbol
//! table entry's `decl` node).

use crate::resolution::SymbolResolution;
use meek_common::{NodeId, Span};
use meek_scanner::{ScanErrorKind, TokenKind};
use meek_symbols::ScopeId;
use meek_types::TypeId;

/// The four node categories `spec.md` §3 groups AST kinds into, plus the
/// supplemented `Program` root.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeCategory {
    Expr,
    Stmt,
    Grp,
    Program,
    Error,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    HashOr,
    HashXor,
    HashAnd,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnOp {
    Plus,
    Neg,
    Not,
    /// Prefix `^`: address-of. Constructs a pointer type by prepending a
    /// `Pointer` modifier (`spec.md` §4.4).
    AddrOf,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
}

impl AssignOp {
    pub fn from_token(kind: TokenKind) -> Option<AssignOp> {
        Some(match kind {
            TokenKind::Equal => AssignOp::Assign,
            TokenKind::PlusEqual => AssignOp::AddAssign,
            TokenKind::MinusEqual => AssignOp::SubAssign,
            TokenKind::StarEqual => AssignOp::MulAssign,
            TokenKind::SlashEqual => AssignOp::DivAssign,
            TokenKind::PercentEqual => AssignOp::RemAssign,
            _ => return None,
        })
    }

    /// A compound assignment (`+=` etc.) desugars to a binary operator
    /// for type-checking purposes; plain `=` has none.
    pub fn as_binop(self) -> Option<BinOp> {
        Some(match self {
            AssignOp::Assign => return None,
            AssignOp::AddAssign => BinOp::Add,
            AssignOp::SubAssign => BinOp::Sub,
            AssignOp::MulAssign => BinOp::Mul,
            AssignOp::DivAssign => BinOp::Div,
            AssignOp::RemAssign => BinOp::Rem,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

/// A single parameter in a function header or literal: `spec.md` §3's
/// parameter group entries. Not a standalone AST node — a parameter
/// list's own malformedness is reported on the enclosing `ParamList`
/// node, not per-parameter.
#[derive(Clone, Debug)]
pub struct ParamDecl {
    pub name: String,
    pub ty: TypeId,
    pub span: Span,
}

/// A struct member declaration: `spec.md` §3's struct field entries.
#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeId,
    pub span: Span,
}

/// The tagged-variant payload of a node. Every producer in the parser
/// returns either a well-formed variant here or one of the `*Err`
/// variants (`spec.md` §4.1's error model).
#[derive(Clone, Debug)]
pub enum NodeKind {
    // ---- Program ----
    Program { stmts: Vec<NodeId>, scope: ScopeId },

    // ---- Statements ----
    Block { stmts: Vec<NodeId>, scope: Option<ScopeId> },
    If { cond: NodeId, then_branch: NodeId, else_branch: Option<NodeId> },
    While { cond: NodeId, body: NodeId, loop_scope: ScopeId },
    Return { value: Option<NodeId> },
    Break,
    Continue,
    VarDecl { name: String, ty: TypeId, init: Option<NodeId>, var_seq_id: u32 },
    StructDefn {
        name: String,
        scope: ScopeId,
        fields: Vec<FieldDecl>,
        defined_type: TypeId,
    },
    FuncDefn {
        name: String,
        scope: ScopeId,
        params: NodeId,
        returns: NodeId,
        body: NodeId,
        defined_type: TypeId,
    },
    Assign { op: AssignOp, lhs: NodeId, rhs: NodeId },
    ExprStmt { expr: NodeId },

    // ---- Expressions ----
    Binop { op: BinOp, lhs: NodeId, rhs: NodeId, eval_type: TypeId },
    Unop { op: UnOp, operand: NodeId, eval_type: TypeId },
    Literal { value: LiteralValue, eval_type: TypeId },
    /// Postfix `expr^`: pointer dereference.
    Deref { operand: NodeId, eval_type: TypeId },
    ArrayAccess { array: NodeId, index: NodeId, eval_type: TypeId },
    MemberAccess { base: NodeId, member: String, eval_type: TypeId },
    Symbol { name: String, eval_type: TypeId, resolution: SymbolResolution },
    Call { callee: NodeId, args: NodeId, eval_type: TypeId },
    FuncLiteral {
        scope: ScopeId,
        params: NodeId,
        returns: NodeId,
        body: NodeId,
        eval_type: TypeId,
    },

    // ---- Groups ----
    ParamList { params: Vec<ParamDecl> },
    ReturnList { types: Vec<(TypeId, Span)> },
    ArgList { args: Vec<NodeId> },

    // ---- Errors ----
    ExpectedTokenErr {
        expected: Vec<TokenKind>,
        found: TokenKind,
        partial: Vec<NodeId>,
    },
    UnexpectedTokenErr { found: TokenKind, partial: Vec<NodeId> },
    ScanErr { kind: ScanErrorKind },
    /// Propagates an inner failure upward without a new user-facing
    /// diagnostic (`spec.md` §3, §7).
    BubbleErr { inner: NodeId },
    IllegalDoStmtErr { inner: NodeId },
    IllegalTopLevelStmtErr { inner: NodeId },
    ChainedAssignErr { lhs: NodeId, chained: NodeId },
    InitUnnamedVarErr { ty: TypeId, partial: Option<NodeId> },
    InvokeFuncLiteralErr { func_literal: NodeId, args: NodeId },
}

impl NodeKind {
    pub fn category(&self) -> NodeCategory {
        use NodeKind::*;
        match self {
            Program { .. } => NodeCategory::Program,

            Block { .. }
            | If { .. }
            | While { .. }
            | Return { .. }
            | Break
            | Continue
            | VarDecl { .. }
            | StructDefn { .. }
            | FuncDefn { .. }
            | Assign { .. }
            | ExprStmt { .. } => NodeCategory::Stmt,

            Binop { .. }
            | Unop { .. }
            | Literal { .. }
            | Deref { .. }
            | ArrayAccess { .. }
            | MemberAccess { .. }
            | Symbol { .. }
            | Call { .. }
            | FuncLiteral { .. } => NodeCategory::Expr,

            ParamList { .. } | ReturnList { .. } | ArgList { .. } => NodeCategory::Grp,

            ExpectedTokenErr { .. }
            | UnexpectedTokenErr { .. }
            | ScanErr { .. }
            | BubbleErr { .. }
            | IllegalDoStmtErr { .. }
            | IllegalTopLevelStmtErr { .. }
            | ChainedAssignErr { .. }
            | InitUnnamedVarErr { .. }
            | InvokeFuncLiteralErr { .. } => NodeCategory::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.category() == NodeCategory::Error
    }

    /// `true` for `BubbleErr` specifically: bubble errors are never
    /// surfaced to the user (`spec.md` §3's invariant).
    pub fn is_bubble(&self) -> bool {
        matches!(self, NodeKind::BubbleErr { .. })
    }
}

/// A single arena-resident AST node: a stable id, its span, and its
/// tagged payload.
#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    pub span: Span,
    pub kind: NodeKind,
}

impl Node {
    pub fn category(&self) -> NodeCategory {
        self.kind.category()
    }

    /// The node's `evalTypeId` decoration, for `Expr`-category nodes.
    pub fn eval_type(&self) -> Option<TypeId> {
        use NodeKind::*;
        match &self.kind {
            Binop { eval_type, .. }
            | Unop { eval_type, .. }
            | Literal { eval_type, .. }
            | Deref { eval_type, .. }
            | ArrayAccess { eval_type, .. }
            | MemberAccess { eval_type, .. }
            | Symbol { eval_type, .. }
            | Call { eval_type, .. }
            | FuncLiteral { eval_type, .. } => Some(*eval_type),
            _ => None,
        }
    }

    pub fn set_eval_type(&mut self, ty: TypeId) {
        use NodeKind::*;
        match &mut self.kind {
            Binop { eval_type, .. }
            | Unop { eval_type, .. }
            | Literal { eval_type, .. }
            | Deref { eval_type, .. }
            | ArrayAccess { eval_type, .. }
            | MemberAccess { eval_type, .. }
            | Symbol { eval_type, .. }
            | Call { eval_type, .. }
            | FuncLiteral { eval_type, .. } => *eval_type = ty,
            _ => {}
        }
    }

    /// The `scopeId` decoration: the scope a declaration node introduces
    /// or inhabits (`spec.md` §3).
    pub fn scope_id(&self) -> Option<ScopeId> {
        match &self.kind {
            NodeKind::Program { scope, .. } => Some(*scope),
            NodeKind::Block { scope, .. } => *scope,
            NodeKind::StructDefn { scope, .. } => Some(*scope),
            NodeKind::FuncDefn { scope, .. } => Some(*scope),
            NodeKind::FuncLiteral { scope, .. } => Some(*scope),
            NodeKind::While { loop_scope, .. } => Some(*loop_scope),
            _ => None,
        }
    }

    /// The `definedTypeId` decoration carried by function and struct
    /// definition nodes (`spec.md` §3).
    pub fn defined_type(&self) -> Option<TypeId> {
        match &self.kind {
            NodeKind::StructDefn { defined_type, .. } => Some(*defined_type),
            NodeKind::FuncDefn { defined_type, .. } => Some(*defined_type),
            _ => None,
        }
    }

    /// Rewrite every `TypeId` this node stores through `types.canonical`.
    /// Run once, over the whole arena, after
    /// `TypeTable::try_resolve_all_types` settles — a field captured
    /// before its type's canonical id existed (a pending slot baked into
    /// the AST ahead of a later, equal, eagerly-interned occurrence)
    /// would otherwise keep comparing unequal to it forever
    /// (`spec.md` §8 invariant #2).
    pub(crate) fn canonicalize_types(&mut self, types: &meek_types::TypeTable) {
        match &mut self.kind {
            NodeKind::VarDecl { ty, .. } => *ty = types.canonical(*ty),
            NodeKind::StructDefn { fields, defined_type, .. } => {
                *defined_type = types.canonical(*defined_type);
                for field in fields.iter_mut() {
                    field.ty = types.canonical(field.ty);
                }
            }
            NodeKind::FuncDefn { defined_type, .. } => {
                *defined_type = types.canonical(*defined_type);
            }
            NodeKind::ParamList { params } => {
                for param in params.iter_mut() {
                    param.ty = types.canonical(param.ty);
                }
            }
            NodeKind::ReturnList { types: returns } => {
                for (ty, _) in returns.iter_mut() {
                    *ty = types.canonical(*ty);
                }
            }
            NodeKind::InitUnnamedVarErr { ty, .. } => *ty = types.canonical(*ty),
            _ => {}
        }
    }
}
