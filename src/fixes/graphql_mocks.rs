use super::FixSet;
use crate::error::Result;
use crate::rule::Rule;

pub const NAME: &str = "graphql-mocks";

pub fn fix_set() -> Result<FixSet> {
    Ok(FixSet::new(
        NAME,
        "Route graphqlClient.request mocks through vi.mocked()",
    )
    .with_default_target("tests/tools/get-price-history.test.ts")
    .with_rule(
        Rule::regex(
            r"\bgraphqlClient\.request\.mock",
            "vi.mocked(graphqlClient).request.mock",
        )?
        .with_description("graphqlClient.request.mock -> vi.mocked(graphqlClient).request.mock"),
    )
    .with_note("Wrapped graphqlClient.request mocks with vi.mocked()"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextBuffer;

    fn run(input: &str) -> String {
        let fixes = fix_set().unwrap();
        let mut buffer = TextBuffer::from_string("get-price-history.test.ts", input);
        buffer.apply(fixes.rules());
        buffer.into_content()
    }

    #[test]
    fn test_wraps_request_mock() {
        assert_eq!(
            run("graphqlClient.request.mock"),
            "vi.mocked(graphqlClient).request.mock"
        );
    }

    #[test]
    fn test_second_run_is_noop() {
        let once = run("graphqlClient.request.mockResolvedValueOnce(data);\n");
        let twice = run(&once);
        assert_eq!(once, "vi.mocked(graphqlClient).request.mockResolvedValueOnce(data);\n");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_respects_word_boundary() {
        let input = "mygraphqlClient.request.mock";
        assert_eq!(run(input), input);
    }
}
