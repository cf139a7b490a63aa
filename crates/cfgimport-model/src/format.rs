//! Signature rendering for diagnostics.
//!
//! Types render in source-like syntax: `List<int>`,
//! `String Function(int, [bool], {int x = 0})`. Type-parameter references
//! render under the name they were declared with.

use crate::types::{ConstValue, DeclRef, ParamList, Type, TypeParam};
use std::fmt;

impl fmt::Display for DeclRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.library, self.name)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => f.write_str("void"),
            Type::Named { decl, args } => {
                f.write_str(&decl.name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    write_list(f, args)?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            Type::Function(func) => write!(f, "{} Function({})", func.return_type, func.params),
            Type::Parameter(param) => f.write_str(&param.name),
        }
    }
}

impl fmt::Display for ParamList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, &self.required)?;
        let mut needs_comma = !self.required.is_empty();
        if !self.optional.is_empty() {
            if needs_comma {
                f.write_str(", ")?;
            }
            f.write_str("[")?;
            write_list(f, &self.optional)?;
            f.write_str("]")?;
            needs_comma = true;
        }
        if !self.named.is_empty() {
            if needs_comma {
                f.write_str(", ")?;
            }
            f.write_str("{")?;
            for (i, (name, param)) in self.named.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{} {name}", param.ty)?;
                if let Some(default) = &param.default {
                    write!(f, " = {default}")?;
                }
            }
            f.write_str("}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.bound {
            Some(bound) => write!(f, "{} extends {bound}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Null => f.write_str("null"),
            ConstValue::Bool(b) => write!(f, "{b}"),
            ConstValue::Int(i) => write!(f, "{i}"),
            ConstValue::Double(d) => write!(f, "{d:?}"),
            ConstValue::String(s) => write!(f, "'{s}'"),
            ConstValue::Reference(r) => f.write_str(r),
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
