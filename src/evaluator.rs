use crate::ast::{
    BlockStatement, Expression, FunctionLiteral, IfExpression, InfixOperator, PrefixOperator,
    Program, Statement,
};
use crate::environment::Environment;
use crate::object::{Function, Object};
use std::cell::RefCell;
use std::rc::Rc;

// Shorthand for the scope handle threaded through every call
type Env = Rc<RefCell<Environment>>;

// --- Evaluate Function ---

/// Evaluates a program within the given environment.
///
/// Never fails at the host level: runtime problems come back as `Object::Error`.
/// A top-level `return` is unwrapped here, so callers never see `ReturnValue`.
pub fn evaluate(program: &Program, env: &Env) -> Rc<Object> {
    let mut result = Object::null();

    for statement in &program.statements {
        result = eval_statement(statement, env);

        if let Object::ReturnValue(inner) = &*result {
            return Rc::clone(inner);
        }
        if result.is_error() {
            return result;
        }
    }

    result
}

fn eval_statement(statement: &Statement, env: &Env) -> Rc<Object> {
    match statement {
        Statement::Expression(statement) => eval_expression(&statement.value, env),
        Statement::Block(block) => eval_block_statement(block, env),
        Statement::Return(statement) => {
            let value = eval_expression(&statement.value, env);
            if value.is_error() {
                return value;
            }
            Rc::new(Object::ReturnValue(value))
        }
        Statement::Let(statement) => {
            let value = eval_expression(&statement.value, env);
            if value.is_error() {
                return value;
            }
            env.borrow_mut().set(statement.name.name.as_str(), value);
            Object::null()
        }
    }
}

// Unlike `evaluate`, a block leaves `ReturnValue` wrapped so the enclosing
// block or function body stops as well.
fn eval_block_statement(block: &BlockStatement, env: &Env) -> Rc<Object> {
    let mut result = Object::null();

    for statement in &block.statements {
        result = eval_statement(statement, env);

        if matches!(&*result, Object::ReturnValue(_) | Object::Error(_)) {
            return result;
        }
    }

    result
}

fn eval_expression(expression: &Expression, env: &Env) -> Rc<Object> {
    match expression {
        Expression::Integer(int) => Rc::new(Object::Integer(int.value)),
        Expression::Boolean(b) => Object::native_bool(b.value),
        Expression::Identifier(ident) => match env.borrow().get(&ident.name) {
            Some(value) => value,
            None => Object::error(format!("identifier not found: {}", ident.name)),
        },
        Expression::Prefix(prefix) => {
            let operand = eval_expression(&prefix.operand, env);
            if operand.is_error() {
                return operand;
            }
            eval_prefix_expression(prefix.operator, &operand)
        }
        Expression::Infix(infix) => {
            let left = eval_expression(&infix.left, env);
            if left.is_error() {
                return left;
            }
            let right = eval_expression(&infix.right, env);
            if right.is_error() {
                return right;
            }
            eval_infix_expression(infix.operator, &left, &right)
        }
        Expression::If(if_expr) => eval_if_expression(if_expr, env),
        Expression::Function(function) => eval_function_literal(function, env),
        Expression::Call(call) => {
            let function = eval_expression(&call.function, env);
            if function.is_error() {
                return function;
            }

            let mut arguments = Vec::with_capacity(call.arguments.len());
            for argument in &call.arguments {
                let value = eval_expression(argument, env);
                if value.is_error() {
                    return value;
                }
                arguments.push(value);
            }

            apply_function(&function, arguments)
        }
    }
}

// --- Operators ---

fn eval_prefix_expression(operator: PrefixOperator, operand: &Rc<Object>) -> Rc<Object> {
    match operator {
        PrefixOperator::Bang => eval_bang_operator(operand),
        PrefixOperator::Minus => match &**operand {
            Object::Integer(value) => Rc::new(Object::Integer(value.wrapping_neg())),
            other => Object::error(format!("unknown operator: -{}", other.object_type())),
        },
    }
}

// Logical negation over truthiness: only `false` and `null` negate to `true`.
fn eval_bang_operator(operand: &Object) -> Rc<Object> {
    Object::native_bool(!operand.is_truthy())
}

fn eval_infix_expression(
    operator: InfixOperator,
    left: &Rc<Object>,
    right: &Rc<Object>,
) -> Rc<Object> {
    match (&**left, &**right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix(operator, *l, *r),
        // Booleans and null are singletons, so identity is value equality for them
        _ if operator == InfixOperator::Eq => Object::native_bool(Rc::ptr_eq(left, right)),
        _ if operator == InfixOperator::NotEq => Object::native_bool(!Rc::ptr_eq(left, right)),
        (l, r) if l.object_type() != r.object_type() => Object::error(format!(
            "type mismatch: {} {} {}",
            l.object_type(),
            operator,
            r.object_type()
        )),
        (l, r) => Object::error(format!(
            "unknown operator: {} {} {}",
            l.object_type(),
            operator,
            r.object_type()
        )),
    }
}

fn eval_integer_infix(operator: InfixOperator, left: i64, right: i64) -> Rc<Object> {
    let value = match operator {
        InfixOperator::Plus => left.wrapping_add(right),
        InfixOperator::Minus => left.wrapping_sub(right),
        InfixOperator::Asterisk => left.wrapping_mul(right),
        InfixOperator::Slash => {
            if right == 0 {
                return Object::error("division by zero");
            }
            left.wrapping_div(right)
        }
        InfixOperator::Lt => return Object::native_bool(left < right),
        InfixOperator::Gt => return Object::native_bool(left > right),
        InfixOperator::Eq => return Object::native_bool(left == right),
        InfixOperator::NotEq => return Object::native_bool(left != right),
    };
    Rc::new(Object::Integer(value))
}

// --- Control flow ---

// Branches run in the current environment; `if` does not open a scope.
fn eval_if_expression(if_expr: &IfExpression, env: &Env) -> Rc<Object> {
    let condition = eval_expression(&if_expr.condition, env);
    if condition.is_error() {
        return condition;
    }

    if condition.is_truthy() {
        eval_block_statement(&if_expr.consequence, env)
    } else if let Some(alternative) = &if_expr.alternative {
        eval_block_statement(alternative, env)
    } else {
        Object::null()
    }
}

// --- Functions ---

fn eval_function_literal(function: &FunctionLiteral, env: &Env) -> Rc<Object> {
    Rc::new(Object::Function(Function {
        parameters: function.parameters.clone(),
        body: Rc::clone(&function.body),
        env: Rc::clone(env),
    }))
}

fn apply_function(callee: &Object, arguments: Vec<Rc<Object>>) -> Rc<Object> {
    let function = match callee {
        Object::Function(function) => function,
        other => return Object::error(format!("not a function: {}", other.object_type())),
    };

    if function.parameters.len() != arguments.len() {
        return Object::error(format!(
            "wrong number of arguments: want={}, got={}",
            function.parameters.len(),
            arguments.len()
        ));
    }

    tracing::trace!(function = ?function, arity = arguments.len(), "applying function");

    // The new frame encloses the *defining* environment, not the caller's.
    let extended_env = Environment::new_enclosed(Rc::clone(&function.env));
    {
        let mut frame = extended_env.borrow_mut();
        for (parameter, argument) in function.parameters.iter().zip(arguments) {
            frame.set(parameter.name.as_str(), argument);
        }
    }

    let result = eval_block_statement(&function.body, &extended_env);
    if let Object::ReturnValue(inner) = &*result {
        return Rc::clone(inner);
    }
    result
}
