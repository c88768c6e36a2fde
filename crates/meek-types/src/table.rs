//! The type table: structural interning for anonymous types, nominal
//! allocation for struct types, and a fixed-point resolver for named type
//! references that may forward-reference a struct declared later in the
//! file.

use crate::base::BaseType;
use crate::id::TypeId;
use crate::pending::{PendingEntry, PendingTypeExpr};
use crate::ty::Type;
use meek_common::{Diagnostic, Span, codes};
use meek_symbols::{ScopeArena, SymbolInfo, SymbolTable};
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct TypeTable {
    types: Vec<Type>,
    interned: FxHashMap<Type, TypeId>,
    pending: Vec<PendingEntry>,
    /// Maps a struct's defining `(name, scope)` to the `TypeId` allocated
    /// for it in `declare_struct`. Structs are nominal, so this is the
    /// only way a pending named-type reference to a struct (including a
    /// self-referential `^S` field parsed before `S`'s own definition
    /// finishes) can ever resolve — `declare_struct` runs before the
    /// struct's body is parsed specifically so this map is populated in
    /// time for self-references (`SPEC_FULL.md` §4.1).
    struct_types: FxHashMap<(String, meek_symbols::ScopeId), TypeId>,
    /// Diagnostics for array sizes rejected during resolution (zero or
    /// negative), accumulated whether the rejection happened eagerly at
    /// parse time or during the fixed-point pass, and drained by
    /// `try_resolve_all_types` (`SPEC_FULL.md` §4.3).
    array_size_errors: Vec<Diagnostic>,
    /// Maps a backfilled pending slot to the id its content turned out
    /// to already be interned (or declared) under. A forward reference
    /// like `^S` parsed before `S`'s declaration gets its own slot id;
    /// if the same structural type is also reached some other way
    /// (another pending entry, or an eager `try_intern_now` elsewhere
    /// in the file), `try_resolve_all_types` must not leave the two as
    /// distinct ids for equal types (`spec.md` §8 invariant #2).
    /// `canonical` follows this map; callers holding an AST-decorated
    /// `TypeId` captured before resolution settled should route through
    /// it rather than comparing raw ids.
    slot_remap: FxHashMap<TypeId, TypeId>,
}

impl TypeTable {
    pub fn new() -> Self {
        let mut table = TypeTable {
            types: Vec::new(),
            interned: FxHashMap::default(),
            pending: Vec::new(),
            struct_types: FxHashMap::default(),
            array_size_errors: Vec::new(),
            slot_remap: FxHashMap::default(),
        };

        // Seed the reserved ids in order; `intern` below is not used here
        // since several of these are sentinel markers rather than
        // interned structural types.
        table.push_reserved(Type::Void); // VOID
        table.push_reserved(Type::Base(BaseType::S32)); // INT alias
        table.push_reserved(Type::Base(BaseType::F32)); // FLOAT alias
        table.push_reserved(Type::Base(BaseType::Bool)); // BOOL
        table.push_reserved(Type::Base(BaseType::Str)); // STRING
        table.push_reserved(Type::Unresolved); // UNRESOLVED
        table.push_reserved(Type::UnresolvedHasCandidates); // UNRESOLVED_HAS_CANDIDATES
        table.push_reserved(Type::Error); // TYPE_ERROR
        table.push_reserved(Type::BubbleError); // BUBBLE_ERROR
        debug_assert_eq!(table.types.len() as u32, TypeId::RESERVED_COUNT);

        // Register the reserved base types in the structural-interning
        // map too, so `int`/`s32` (etc.) collapse onto the same id as the
        // reserved alias instead of allocating a duplicate entry.
        table.interned.insert(Type::Base(BaseType::S32), TypeId::INT);
        table
            .interned
            .insert(Type::Base(BaseType::F32), TypeId::FLOAT);
        table.interned.insert(Type::Base(BaseType::Bool), TypeId::BOOL);
        table
            .interned
            .insert(Type::Base(BaseType::Str), TypeId::STRING);

        table
    }

    fn push_reserved(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    /// Structurally intern a fully-known type (base types, pointers,
    /// arrays, function signatures whose components are all already
    /// resolved). Returns an existing id if an identical type was
    /// interned before.
    pub fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.interned.get(&ty) {
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.interned.insert(ty.clone(), id);
        self.types.push(ty);
        id
    }

    pub fn intern_base(&mut self, base: BaseType) -> TypeId {
        self.intern(Type::Base(base))
    }

    /// Allocate a fresh, never-deduplicated slot for a struct
    /// declaration, registered under `(name, scope)` so later pending
    /// references (including self-referential pointer fields parsed
    /// before the struct's body finishes) can find it. Call
    /// `set_struct_fields` once the field list has been resolved.
    pub fn declare_struct(
        &mut self,
        name: impl Into<String>,
        scope: meek_symbols::ScopeId,
    ) -> TypeId {
        let name = name.into();
        let id = TypeId(self.types.len() as u32);
        self.types.push(Type::Struct {
            name: name.clone(),
            fields: Vec::new(),
        });
        self.struct_types.insert((name, scope), id);
        id
    }

    pub fn set_struct_fields(&mut self, id: TypeId, fields: Vec<(String, TypeId)>) {
        if let Type::Struct { fields: slot, .. } = &mut self.types[id.index()] {
            *slot = fields;
        }
    }

    /// Register a type expression that cannot be resolved until other
    /// (possibly later-declared) named types are known. Returns a stable
    /// placeholder id; the slot is backfilled in place once
    /// `try_resolve_all_types` succeeds, or replaced with `TypeError`
    /// if it never does.
    pub fn register_pending(&mut self, expr: PendingTypeExpr, span: Span) -> TypeId {
        if let PendingTypeExpr::Resolved(id) = expr {
            return id;
        }
        let slot = TypeId(self.types.len() as u32);
        self.types.push(Type::Unresolved);
        self.pending.push(PendingEntry { slot, expr, span });
        slot
    }

    /// Try to resolve `expr` immediately against the current state of
    /// `symbols`/`scopes`, without registering a pending entry. Used by
    /// the parser at the point a type expression is captured: if every
    /// component can be interned right now (`spec.md` §4.1), the caller
    /// writes the resulting id directly into the AST decoration instead
    /// of going through `register_pending`.
    pub fn try_intern_now(
        &mut self,
        expr: &PendingTypeExpr,
        symbols: &SymbolTable,
        scopes: &ScopeArena,
    ) -> Option<TypeId> {
        self.try_resolve_expr(expr, symbols, scopes)
    }

    /// Run the fixed-point resolver: repeatedly attempt to resolve every
    /// pending named-type reference until a full pass makes no more
    /// progress. Composite expressions (arrays of structs, function
    /// signatures mentioning structs) are retried whole each pass, so a
    /// struct that itself embeds another not-yet-declared struct still
    /// resolves once its dependency does (`SPEC_FULL.md` §4.3, §9).
    pub fn try_resolve_all_types(
        &mut self,
        symbols: &SymbolTable,
        scopes: &ScopeArena,
    ) -> Vec<Diagnostic> {
        loop {
            let mut progressed = false;
            let mut still_pending = Vec::new();

            for entry in std::mem::take(&mut self.pending) {
                match self.try_resolve_expr(&entry.expr, symbols, scopes) {
                    Some(resolved) => {
                        self.types[entry.slot.index()] = self.types[resolved.index()].clone();
                        if resolved != entry.slot {
                            self.slot_remap.insert(entry.slot, resolved);
                        }
                        progressed = true;
                    }
                    None => still_pending.push(entry),
                }
            }

            self.pending = still_pending;
            if !progressed || self.pending.is_empty() {
                break;
            }
        }

        let mut diagnostics = Vec::new();
        for entry in self.pending.drain(..) {
            diagnostics.push(Diagnostic::error(
                codes::TYPE_UNRESOLVED_IDENTIFIER,
                entry.span,
                format!("could not resolve type '{}'", describe(&entry.expr)),
            ));
            self.types[entry.slot.index()] = Type::Error;
        }

        self.canonicalize_internal_types();
        diagnostics
    }

    /// The canonical id for `id`: follows `slot_remap` to the id a
    /// backfilled pending slot's content turned out to already be
    /// interned under, so two occurrences of the same structural type
    /// compare equal even when one was captured before the other
    /// existed. Returns `id` unchanged if it was never remapped.
    pub fn canonical(&self, id: TypeId) -> TypeId {
        resolve_remap(&self.slot_remap, id)
    }

    /// After the fixed-point pass settles, rewrite every `TypeId` a
    /// composite or struct type embeds so none of them still point at
    /// a superseded pending slot. Without this, `size_of`/`field_offset`
    /// keep working (the slot's own row was backfilled with equivalent
    /// content above), but a type that contains the slot id as a
    /// component would still compare unequal to the structurally
    /// identical type built from the canonical id.
    fn canonicalize_internal_types(&mut self) {
        if self.slot_remap.is_empty() {
            return;
        }
        let remap = &self.slot_remap;
        for ty in self.types.iter_mut() {
            match ty {
                Type::Pointer(inner) => *inner = resolve_remap(remap, *inner),
                Type::Array { element, .. } => *element = resolve_remap(remap, *element),
                Type::Function { params, ret } => {
                    for param in params.iter_mut() {
                        *param = resolve_remap(remap, *param);
                    }
                    *ret = resolve_remap(remap, *ret);
                }
                Type::Struct { fields, .. } => {
                    for (_, field_ty) in fields.iter_mut() {
                        *field_ty = resolve_remap(remap, *field_ty);
                    }
                }
                Type::Void
                | Type::Base(_)
                | Type::Unresolved
                | Type::UnresolvedHasCandidates
                | Type::Error
                | Type::BubbleError => {}
            }
        }
    }

    fn try_resolve_expr(
        &mut self,
        expr: &PendingTypeExpr,
        symbols: &SymbolTable,
        scopes: &ScopeArena,
    ) -> Option<TypeId> {
        match expr {
            PendingTypeExpr::Resolved(id) => Some(*id),
            PendingTypeExpr::Named { name, scope } => {
                // Confirm the name actually names a struct visible from
                // `scope` (walking outward, same order as `SymbolTable`
                // lookups), then resolve it through `struct_types` keyed
                // by the scope that declared it rather than the scope it
                // was referenced from.
                for candidate_scope in scopes.chain(*scope) {
                    match symbols.lookup_type(scopes, candidate_scope, name, true) {
                        Some(SymbolInfo::Struct { .. }) => {
                            return self.struct_types.get(&(name.clone(), candidate_scope)).copied();
                        }
                        _ => continue,
                    }
                }
                None
            }
            PendingTypeExpr::Pointer(inner) => {
                let inner_id = self.try_resolve_expr(inner, symbols, scopes)?;
                Some(self.intern(Type::Pointer(inner_id)))
            }
            PendingTypeExpr::Array { element, size } => {
                if *size <= 0 {
                    return Some(TypeId::TYPE_ERROR);
                }
                let element_id = self.try_resolve_expr(element, symbols, scopes)?;
                Some(self.intern(Type::Array {
                    element: element_id,
                    size: *size as u32,
                }))
            }
            PendingTypeExpr::Function { params, ret } => {
                let mut param_ids = Vec::with_capacity(params.len());
                for param in params {
                    param_ids.push(self.try_resolve_expr(param, symbols, scopes)?);
                }
                let ret_id = self.try_resolve_expr(ret, symbols, scopes)?;
                Some(self.intern(Type::Function {
                    params: param_ids,
                    ret: ret_id,
                }))
            }
        }
    }

    /// Size in bytes of a fully-resolved type, used by the bytecode
    /// emitter's frame-layout pass (`SPEC_FULL.md` §4.5). Pointers and
    /// function values are addresses, sized at the emitter's target
    /// pointer width; an unresolved or error type has no meaningful
    /// size and is treated as zero-sized rather than panicking, since
    /// the resolve pass has already reported a diagnostic for it.
    pub fn size_of(&self, id: TypeId) -> u32 {
        match self.get(id) {
            Type::Void => 0,
            Type::Base(base) => base.size_bytes(),
            Type::Pointer(_) | Type::Function { .. } => crate::POINTER_SIZE_BYTES,
            Type::Array { element, size } => self.size_of(*element) * size,
            Type::Struct { fields, .. } => fields.iter().map(|(_, ty)| self.size_of(*ty)).sum(),
            Type::Unresolved | Type::UnresolvedHasCandidates | Type::Error | Type::BubbleError => 0,
        }
    }

    /// A struct field's byte offset from the struct's own base address,
    /// and its type — the cumulative size of every field declared before
    /// it, in declaration order. `None` if `struct_id` isn't a struct or
    /// has no field by that name.
    pub fn field_offset(&self, struct_id: TypeId, name: &str) -> Option<(u32, TypeId)> {
        let Type::Struct { fields, .. } = self.get(struct_id) else {
            return None;
        };
        let mut offset = 0;
        for (field_name, field_ty) in fields {
            if field_name == name {
                return Some((offset, *field_ty));
            }
            offset += self.size_of(*field_ty);
        }
        None
    }
}

/// Follow `remap` from `id` to its final target, stopping as soon as a
/// step maps back to itself or the chain runs out of entries — `remap`
/// is expected to settle in one hop in practice, but this stays correct
/// if a slot ever gets remapped to another slot that is itself remapped.
fn resolve_remap(remap: &FxHashMap<TypeId, TypeId>, mut id: TypeId) -> TypeId {
    let mut steps = 0;
    while let Some(&next) = remap.get(&id) {
        if next == id || steps > remap.len() {
            break;
        }
        id = next;
        steps += 1;
    }
    id
}

fn describe(expr: &PendingTypeExpr) -> String {
    match expr {
        PendingTypeExpr::Resolved(id) => format!("{id}"),
        PendingTypeExpr::Named { name, .. } => name.clone(),
        PendingTypeExpr::Pointer(inner) => format!("^{}", describe(inner)),
        PendingTypeExpr::Array { element, size } => format!("{}[{}]", describe(element), size),
        PendingTypeExpr::Function { params, ret } => {
            let params = params.iter().map(describe).collect::<Vec<_>>().join(", ");
            format!("fn({}) -> {}", params, describe(ret))
        }
    }
}
