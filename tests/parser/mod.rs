mod tests_conditional;
mod tests_errors;
mod tests_expressions;
mod tests_literal;
mod tests_positions;
