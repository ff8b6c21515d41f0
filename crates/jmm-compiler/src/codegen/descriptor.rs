//! JVM type descriptors and class name resolution

use crate::error::{CompileError, CompileResult};
use jmm_types::Type;

/// Internal name of `java.lang.String`
pub const STRING_CLASS: &str = "java/lang/String";

/// Maps unqualified class names to JVM internal names
#[derive(Debug, Clone)]
pub struct ClassResolver<'a> {
    class_name: &'a str,
    imports: &'a [String],
}

impl<'a> ClassResolver<'a> {
    pub fn new(class_name: &'a str, imports: &'a [String]) -> Self {
        Self { class_name, imports }
    }

    /// Internal name of `name`.
    ///
    /// The longest import whose dotted path ends with `name` wins, with dots
    /// turned into slashes. The class itself and unknown names stay as they
    /// are.
    pub fn qualify(&self, name: &str) -> String {
        if name == self.class_name {
            return name.to_string();
        }
        if name == jmm_types::ty::STRING {
            return STRING_CLASS.to_string();
        }
        let suffix = format!(".{}", name);
        self.imports
            .iter()
            .filter(|import| import.as_str() == name || import.ends_with(&suffix))
            .max_by_key(|import| import.len())
            .map(|import| import.replace('.', "/"))
            .unwrap_or_else(|| name.to_string())
    }

    /// Field or parameter descriptor of `ty`
    pub fn descriptor(&self, ty: &Type) -> CompileResult<String> {
        let element = match ty.name.as_str() {
            jmm_types::ty::INT => "I".to_string(),
            jmm_types::ty::BOOLEAN => "Z".to_string(),
            jmm_types::ty::VOID if ty.is_array => {
                return Err(CompileError::representation("array of void has no descriptor"));
            }
            jmm_types::ty::VOID => "V".to_string(),
            name => format!("L{};", self.qualify(name)),
        };
        Ok(if ty.is_array {
            format!("[{}", element)
        } else {
            element
        })
    }

    /// Method descriptor `(params)ret`
    pub fn method_descriptor<'t>(
        &self,
        params: impl IntoIterator<Item = &'t Type>,
        return_ty: &Type,
    ) -> CompileResult<String> {
        let mut out = String::from("(");
        for param in params {
            if param.is_void() && !param.is_array {
                return Err(CompileError::representation("void parameter has no descriptor"));
            }
            out.push_str(&self.descriptor(param)?);
        }
        out.push(')');
        out.push_str(&self.descriptor(return_ty)?);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn imports() -> Vec<String> {
        vec!["io".into(), "java.util.List".into(), "util.List".into()]
    }

    #[test]
    fn test_qualify_prefers_longest_import() {
        let imports = imports();
        let resolver = ClassResolver::new("Main", &imports);
        assert_eq!(resolver.qualify("List"), "java/util/List");
        assert_eq!(resolver.qualify("io"), "io");
        assert_eq!(resolver.qualify("Main"), "Main");
        assert_eq!(resolver.qualify("String"), STRING_CLASS);
        assert_eq!(resolver.qualify("Unknown"), "Unknown");
    }

    #[test]
    fn test_descriptors() {
        let imports = imports();
        let resolver = ClassResolver::new("Main", &imports);
        assert_eq!(resolver.descriptor(&Type::int()).unwrap(), "I");
        assert_eq!(resolver.descriptor(&Type::boolean()).unwrap(), "Z");
        assert_eq!(resolver.descriptor(&Type::void()).unwrap(), "V");
        assert_eq!(resolver.descriptor(&Type::int_array()).unwrap(), "[I");
        assert_eq!(
            resolver.descriptor(&Type::array("String")).unwrap(),
            "[Ljava/lang/String;"
        );
        assert_eq!(resolver.descriptor(&Type::new("List")).unwrap(), "Ljava/util/List;");
        assert!(resolver.descriptor(&Type::array("void")).is_err());

        let desc = resolver
            .method_descriptor([&Type::int(), &Type::int_array()], &Type::boolean())
            .unwrap();
        assert_eq!(desc, "(I[I)Z");
    }
}
