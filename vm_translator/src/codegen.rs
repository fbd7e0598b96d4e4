use vm_command::Command;

/// Turns one parsed command into assembly lines.
///
/// Called exactly once per command, in source order.
pub trait CodeGenerator {
    fn generate(&mut self, command: &Command) -> Vec<String>;
}

/// Emits the normalized source line of each command unchanged.
#[derive(Debug, Default)]
pub struct Passthrough;

impl CodeGenerator for Passthrough {
    fn generate(&mut self, command: &Command) -> Vec<String> {
        vec![command.text().to_string()]
    }
}

impl<G: CodeGenerator + ?Sized> CodeGenerator for &mut G {
    fn generate(&mut self, command: &Command) -> Vec<String> {
        (**self).generate(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_echoes_source_text() {
        let command = Command::parse("pop   argument 1").unwrap();
        assert_eq!(Passthrough.generate(&command), vec!["pop   argument 1"]);
    }

    #[test]
    fn passthrough_keeps_loose_keywords_and_extra_tokens() {
        for line in ["pushy local 1", "returned", "push constant 7 extra"].iter() {
            let command = Command::parse(line).unwrap();
            assert_eq!(Passthrough.generate(&command), vec![line.to_string()]);
        }
    }
}
