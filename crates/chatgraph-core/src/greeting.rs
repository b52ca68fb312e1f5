/// Greet `name`, or the world when no name is given.
pub fn say_hello(name: Option<&str>) -> String {
    format!("Hello, {}!", name.unwrap_or("World"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_say_hello_defaults_to_world() {
        assert_eq!(say_hello(None), "Hello, World!");
    }

    #[test]
    fn test_say_hello_with_name() {
        assert_eq!(say_hello(Some("Ada")), "Hello, Ada!");
    }
}
