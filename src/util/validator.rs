use error_stack::Report;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Error)]
#[error("Invalid given data occurred")]
pub struct Wrapper;

pub trait IntoValidatorReport<T> {
    fn into_validator_report(self) -> error_stack::Result<T, Wrapper>;
}

impl<T> IntoValidatorReport<T> for Result<T, ValidationErrors> {
    fn into_validator_report(self) -> error_stack::Result<T, Wrapper> {
        self.map_err(|errors| {
            describe_errors(&errors)
                .into_iter()
                .fold(Report::new(Wrapper), Report::attach_printable)
        })
    }
}

/// Flattens validation errors into `path.to.field: message` lines,
/// sorted by path.
#[must_use]
pub fn describe_errors(errors: &ValidationErrors) -> Vec<String> {
    fn read_errors(errors: &ValidationErrors, path: &mut Vec<String>, output: &mut Vec<String>) {
        let mut fields = errors.errors().iter().collect::<Vec<_>>();
        fields.sort_by_key(|(field, _)| *field);

        for (field, kind) in fields {
            path.push((*field).to_string());
            match kind {
                ValidationErrorsKind::Struct(inner) => read_errors(inner, path, output),
                ValidationErrorsKind::List(list) => {
                    for (index, inner) in list {
                        path.push(index.to_string());
                        read_errors(inner, path, output);
                        path.pop();
                    }
                }
                ValidationErrorsKind::Field(messages) => {
                    let field = path.join(".");
                    for error in messages {
                        let message = error.message.as_ref().unwrap_or(&error.code);
                        output.push(format!("{field}: {message}"));
                    }
                }
            }
            path.pop();
        }
    }

    let mut output = Vec::new();
    read_errors(errors, &mut Vec::new(), &mut output);
    output
}
