// Operator levels of the evaluator, each returning None when its operator is absent
use super::{EvalState, Evaluator};
use crate::error::ExprError;

fn is_signed_operand_prefix(c: char) -> bool {
    matches!(c, '*' | '/' | '^')
}

/// `+` and `-`, split at top level. A sign at the very start belongs to the number.
pub(super) fn additive(ev: &Evaluator<'_>, input: &str, state: &mut EvalState) -> Option<f64> {
    if !input.chars().skip(1).any(|c| c == '+' || c == '-') {
        return None;
    }

    let mut terms: Vec<String> = vec![String::new()];
    let mut negative: Vec<bool> = vec![false];
    for c in input.chars() {
        match c {
            '+' | '-' => {
                terms.push(String::new());
                negative.push(c == '-');
            }
            _ => {
                if let Some(term) = terms.last_mut() {
                    term.push(c);
                }
            }
        }
    }

    // "2*-3", "4/+2" and "2^-1": the sign belongs to the following operand
    let mut k = 0;
    while k + 1 < terms.len() {
        if terms[k].ends_with(is_signed_operand_prefix) {
            let next = terms.remove(k + 1);
            let next_negative = negative.remove(k + 1);
            terms[k].push(if next_negative { '-' } else { '+' });
            terms[k].push_str(&next);
        } else {
            k += 1;
        }
    }
    if terms.len() < 2 {
        return None;
    }

    let mut value = 0.0;
    for k in 0..terms.len() {
        if terms[k].is_empty() {
            // "--3" or a leading "-": the sign carries over to the next term
            if negative[k] && k + 1 < terms.len() {
                negative[k + 1] = !negative[k + 1];
            }
            continue;
        }
        let term = ev.eval(&terms[k], state);
        if negative[k] {
            value -= term;
        } else {
            value += term;
        }
    }
    state.calculated = true;
    Some(value)
}

/// `*` and `/`, folded left to right. Division by zero is reported and skipped.
pub(super) fn multiplicative(ev: &Evaluator<'_>, input: &str, state: &mut EvalState) -> Option<f64> {
    if !input.contains(|c: char| c == '*' || c == '/') {
        return None;
    }

    let mut factors: Vec<&str> = Vec::new();
    let mut operators: Vec<char> = Vec::new();
    let mut start = 0;
    for (i, c) in input.char_indices() {
        if c == '*' || c == '/' {
            factors.push(&input[start..i]);
            operators.push(c);
            start = i + c.len_utf8();
        }
    }
    factors.push(&input[start..]);

    // An empty operand is reported against the operator in force and does not replace it
    let mut op = '*';
    let mut value = 1.0;
    for (k, factor) in factors.into_iter().enumerate() {
        if factor.trim().is_empty() {
            state.errors.push(if op == '/' {
                ExprError::EmptyDenominator
            } else {
                ExprError::EmptyFactor
            });
            continue;
        }
        let operand = ev.eval(factor, state);
        if op == '/' {
            if operand == 0.0 {
                state.errors.push(ExprError::DivisionByZero);
            } else {
                value /= operand;
            }
        } else {
            value *= operand;
        }
        if let Some(&next) = operators.get(k) {
            op = next;
        }
    }
    state.calculated = true;
    Some(value)
}

/// `%` divides by 100. Text on both sides multiplies: "50%200" is 50 * 200 / 100.
pub(super) fn percent(ev: &Evaluator<'_>, input: &str, state: &mut EvalState) -> Option<f64> {
    let i = input.find('%')?;
    let (left, right) = (&input[..i], &input[i + 1..]);

    let mut value = 0.01;
    for part in [right, left] {
        if !part.is_empty() {
            value *= ev.eval(part, state);
        }
    }
    state.calculated = true;
    Some(value)
}

/// `^`, split on the first caret so chains are right-associative.
pub(super) fn power(ev: &Evaluator<'_>, input: &str, state: &mut EvalState) -> Option<f64> {
    let i = input.find('^')?;
    let (base, exponent) = (&input[..i], &input[i + 1..]);

    state.calculated = true;
    if base.is_empty() {
        state.errors.push(ExprError::EmptyBase);
        return Some(0.0);
    }
    if exponent.is_empty() {
        state.errors.push(ExprError::EmptyExponent);
        return Some(1.0);
    }
    let base = ev.eval(base, state);
    let exponent = ev.eval(exponent, state);
    Some(base.powf(exponent))
}
