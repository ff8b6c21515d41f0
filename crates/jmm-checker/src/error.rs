//! Error types for type inference and semantic checking
//!
//! Every error carries the span of the offending node. Errors are collected,
//! never thrown: the checker keeps going after each one.

use jmm_ast::Span;
use jmm_types::Type;
use thiserror::Error;

/// Errors raised while inferring the type of an expression
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypeError {
    /// Name not found among locals, parameters or fields
    #[error("variable '{name}' not found")]
    UndefinedVariable {
        /// Variable name
        name: String,
        /// Location of the reference
        span: Span,
    },

    /// `new C()` for a class that is neither declared, imported nor the superclass
    #[error("class '{name}' not found")]
    UndefinedClass {
        /// Class name
        name: String,
        /// Location of the allocation
        span: Span,
    },

    /// Operand of the wrong type
    #[error("operator '{op}' expects {expected} operands, found {actual}")]
    InvalidOperand {
        /// Operator symbol
        op: &'static str,
        /// Required operand type
        expected: Type,
        /// Operand type found
        actual: Type,
        /// Location of the operand
        span: Span,
    },

    /// Array used with `+ - * /`
    #[error("arrays cannot be used in arithmetic operations ('{op}')")]
    ArrayInArithmetic {
        /// Operator symbol
        op: &'static str,
        /// Location of the array operand
        span: Span,
    },

    /// `==` or `!=` between unrelated types
    #[error("cannot compare {left} with {right} using '{op}'")]
    IncompatibleOperands {
        /// Operator symbol
        op: &'static str,
        /// Left operand type
        left: Type,
        /// Right operand type
        right: Type,
        /// Location of the comparison
        span: Span,
    },

    /// Property other than `length`
    #[error("unknown property '{property}', only 'length' is supported")]
    UnknownProperty {
        /// Property name
        property: String,
        /// Location of the access
        span: Span,
    },

    /// `length` on a non-array value
    #[error("'length' requires an array, found {actual}")]
    LengthOnNonArray {
        /// Receiver type
        actual: Type,
        /// Location of the access
        span: Span,
    },

    /// Array literal whose elements do not share one type
    #[error("array literal elements must all be {expected}, found {actual}")]
    MixedArrayLiteral {
        /// Type of the first element
        expected: Type,
        /// First differing element type
        actual: Type,
        /// Location of the differing element
        span: Span,
    },

    /// Array literal or allocation with array elements
    #[error("arrays of arrays are not supported")]
    NestedArray {
        /// Location of the construct
        span: Span,
    },

    /// `new int[n]` where `n` is not an integer literal
    #[error("array length must be an integer literal")]
    NonLiteralArrayLength {
        /// Location of the length expression
        span: Span,
    },

    /// Index expression that is not `int`
    #[error("array index must be int, found {actual}")]
    IndexNotInt {
        /// Index type
        actual: Type,
        /// Location of the index
        span: Span,
    },

    /// Indexing a non-array value
    #[error("cannot index into a value of type {actual}")]
    IndexOnNonArray {
        /// Receiver type
        actual: Type,
        /// Location of the receiver
        span: Span,
    },

    /// `f()[i]`
    #[error("cannot index directly into the result of a method call")]
    IndexOnCallResult {
        /// Location of the call
        span: Span,
    },

    /// Method not declared in the class
    #[error("method '{name}' not found")]
    UndefinedMethod {
        /// Method name
        name: String,
        /// Location of the call
        span: Span,
    },

    /// Wrong number of arguments to a local method
    #[error("method '{method}' expects {}, found {actual}", argument_count(.expected, .varargs))]
    ArgumentCountMismatch {
        /// Method name
        method: String,
        /// Number of parameters (fixed ones for varargs methods)
        expected: usize,
        /// Number of arguments given
        actual: usize,
        /// Whether the method takes trailing varargs
        varargs: bool,
        /// Location of the call
        span: Span,
    },

    /// Argument whose type does not match its parameter
    #[error("argument {position} of '{method}' expects {expected}, found {actual}")]
    ArgumentTypeMismatch {
        /// Method name
        method: String,
        /// 1-based argument position
        position: usize,
        /// Parameter type
        expected: Type,
        /// Argument type
        actual: Type,
        /// Location of the argument
        span: Span,
    },

    /// Method called on a primitive, array or unrelated value
    #[error("cannot call method '{method}' on a value of type {receiver}")]
    InvalidReceiver {
        /// Method name
        method: String,
        /// Receiver type
        receiver: Type,
        /// Location of the call
        span: Span,
    },

    /// Result of an opaque call used where no type can be inferred
    #[error("cannot infer the result type of '{method}' here")]
    UnresolvedCallType {
        /// Method name
        method: String,
        /// Location of the call
        span: Span,
    },

    /// Call returning `void` used as a value
    #[error("method '{method}' returns void and cannot be used as a value")]
    VoidValue {
        /// Method name
        method: String,
        /// Location of the call
        span: Span,
    },

    /// `this` inside a static method
    #[error("'this' cannot be used in a static method")]
    ThisInStatic {
        /// Location of `this`
        span: Span,
    },

    /// Field accessed from a static method
    #[error("field '{name}' cannot be accessed from a static method")]
    FieldInStatic {
        /// Field name
        name: String,
        /// Location of the access
        span: Span,
    },
}

fn argument_count(expected: &usize, varargs: &bool) -> String {
    match (*expected, *varargs) {
        (n, true) => format!("at least {n} arguments"),
        (1, false) => "1 argument".to_string(),
        (n, false) => format!("{n} arguments"),
    }
}

impl TypeError {
    /// Location of the error
    pub fn span(&self) -> Span {
        use TypeError::*;

        match self {
            UndefinedVariable { span, .. }
            | UndefinedClass { span, .. }
            | InvalidOperand { span, .. }
            | ArrayInArithmetic { span, .. }
            | IncompatibleOperands { span, .. }
            | UnknownProperty { span, .. }
            | LengthOnNonArray { span, .. }
            | MixedArrayLiteral { span, .. }
            | NestedArray { span }
            | NonLiteralArrayLength { span }
            | IndexNotInt { span, .. }
            | IndexOnNonArray { span, .. }
            | IndexOnCallResult { span }
            | UndefinedMethod { span, .. }
            | ArgumentCountMismatch { span, .. }
            | ArgumentTypeMismatch { span, .. }
            | InvalidReceiver { span, .. }
            | UnresolvedCallType { span, .. }
            | VoidValue { span, .. }
            | ThisInStatic { span }
            | FieldInStatic { span, .. } => *span,
        }
    }
}

/// Semantic errors reported by the checker
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CheckError {
    /// Expression could not be typed
    #[error(transparent)]
    Type(#[from] TypeError),

    /// Two imports with the same last segment
    #[error("duplicate import '{name}'")]
    DuplicateImport {
        /// Last dotted segment
        name: String,
        /// Location of the second import
        span: Span,
    },

    /// Two fields with the same name
    #[error("duplicate field '{name}'")]
    DuplicateField {
        /// Field name
        name: String,
        /// Location of the second declaration
        span: Span,
    },

    /// Two methods with the same name
    #[error("duplicate method '{name}'")]
    DuplicateMethod {
        /// Method name
        name: String,
        /// Location of the second declaration
        span: Span,
    },

    /// Two parameters or locals with the same name
    #[error("duplicate variable '{name}' in method '{method}'")]
    DuplicateVariable {
        /// Variable name
        name: String,
        /// Enclosing method
        method: String,
        /// Location of the second declaration
        span: Span,
    },

    /// Varargs parameter that is not the last one
    #[error("varargs parameter '{param}' of '{method}' must be the last parameter")]
    VarargsNotLast {
        /// Method name
        method: String,
        /// Parameter name
        param: String,
        /// Location of the parameter
        span: Span,
    },

    /// Field or local declared with varargs type
    #[error("variable '{name}' cannot be declared varargs")]
    VarargsVariable {
        /// Variable name
        name: String,
        /// Location of the declaration
        span: Span,
    },

    /// Method declared with varargs return type
    #[error("method '{method}' cannot return varargs")]
    VarargsReturn {
        /// Method name
        method: String,
        /// Location of the method
        span: Span,
    },

    /// Parameter named `length`
    #[error("parameter of '{method}' cannot be named 'length'")]
    ReservedParameterName {
        /// Method name
        method: String,
        /// Location of the parameter
        span: Span,
    },

    /// Wrong number of return statements
    #[error("method '{method}' must contain {expected} return statement, found {actual}")]
    ReturnCount {
        /// Method name
        method: String,
        /// "exactly one" or "at most one"
        expected: &'static str,
        /// Number of return statements found
        actual: usize,
        /// Location of the method
        span: Span,
    },

    /// Return statement that is not the last statement
    #[error("return statement must be the last statement of method '{method}'")]
    ReturnNotLast {
        /// Method name
        method: String,
        /// Location of the misplaced return
        span: Span,
    },

    /// `if`/`while` condition that is not a scalar boolean
    #[error("condition must be boolean, found {actual}")]
    InvalidCondition {
        /// Condition type
        actual: Type,
        /// Location of the condition
        span: Span,
    },

    /// Assignment of an incompatible value
    #[error("cannot assign {actual} to '{target}' of type {expected}")]
    AssignMismatch {
        /// Assigned variable
        target: String,
        /// Declared type of the target
        expected: Type,
        /// Type of the assigned value
        actual: Type,
        /// Location of the assignment
        span: Span,
    },

    /// Returned value incompatible with the declared return type
    #[error("method '{method}' returns {expected}, found {actual}")]
    ReturnMismatch {
        /// Method name
        method: String,
        /// Declared return type
        expected: Type,
        /// Type of the returned value
        actual: Type,
        /// Location of the return
        span: Span,
    },
}

impl CheckError {
    /// Location of the error
    pub fn span(&self) -> Span {
        use CheckError::*;

        match self {
            Self::Type(err) => err.span(),
            DuplicateImport { span, .. }
            | DuplicateField { span, .. }
            | DuplicateMethod { span, .. }
            | DuplicateVariable { span, .. }
            | VarargsNotLast { span, .. }
            | VarargsVariable { span, .. }
            | VarargsReturn { span, .. }
            | ReservedParameterName { span, .. }
            | ReturnCount { span, .. }
            | ReturnNotLast { span, .. }
            | InvalidCondition { span, .. }
            | AssignMismatch { span, .. }
            | ReturnMismatch { span, .. } => *span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_count_message() {
        let fixed = TypeError::ArgumentCountMismatch {
            method: "f".into(),
            expected: 1,
            actual: 3,
            varargs: false,
            span: Span::default(),
        };
        assert_eq!(fixed.to_string(), "method 'f' expects 1 argument, found 3");

        let varargs = TypeError::ArgumentCountMismatch {
            method: "g".into(),
            expected: 2,
            actual: 1,
            varargs: true,
            span: Span::default(),
        };
        assert_eq!(varargs.to_string(), "method 'g' expects at least 2 arguments, found 1");
    }

    #[test]
    fn test_type_error_is_transparent() {
        let err: CheckError = TypeError::ThisInStatic {
            span: Span::at(4, 9),
        }
        .into();
        assert_eq!(err.to_string(), "'this' cannot be used in a static method");
        assert_eq!(err.span(), Span::at(4, 9));
    }
}
