//! Built-in tool catalog.
//!
//! Canonical names, trigger and extractor patterns (English and Russian),
//! and the alias table the default resolver is built from.

use super::entities::ToolDescriptor;
use crate::alias::AliasResolver;
use crate::intent::IntentRecognizer;

pub const EXECUTE_SHELL: &str = "execute_shell";
pub const FILE_OPERATIONS: &str = "file_operations";
pub const WEB_SCRAPER: &str = "web_scraper";
pub const API_CALL: &str = "api_call";
pub const WEB_SEARCH: &str = "web_search";
pub const CODE_GENERATOR: &str = "code_generator";
pub const DATA_ANALYZER: &str = "data_analyzer";
pub const TRANSLATOR: &str = "translator";

/// All canonical names, in registration order
pub const CANONICAL_TOOLS: &[&str] = &[
    EXECUTE_SHELL,
    FILE_OPERATIONS,
    WEB_SCRAPER,
    API_CALL,
    WEB_SEARCH,
    CODE_GENERATOR,
    DATA_ANALYZER,
    TRANSLATOR,
];

/// Pattern matching a single http(s) URL, shared with the heuristics
pub const URL_PATTERN: &str = r#"https?://[^\s<>"'`]+[^\s<>"'`.,;:!?)\]]"#;

/// Alias → canonical pairs, in registration order
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("run_command", EXECUTE_SHELL),
    ("shell", EXECUTE_SHELL),
    ("bash", EXECUTE_SHELL),
    ("terminal", EXECUTE_SHELL),
    ("exec", EXECUTE_SHELL),
    ("execute", EXECUTE_SHELL),
    ("cmd", EXECUTE_SHELL),
    ("command", EXECUTE_SHELL),
    ("run_shell", EXECUTE_SHELL),
    ("shell_exec", EXECUTE_SHELL),
    ("file_manager", FILE_OPERATIONS),
    ("file_ops", FILE_OPERATIONS),
    ("files", FILE_OPERATIONS),
    ("read_file", FILE_OPERATIONS),
    ("write_file", FILE_OPERATIONS),
    ("list_files", FILE_OPERATIONS),
    ("file_system", FILE_OPERATIONS),
    ("filesystem", FILE_OPERATIONS),
    ("scraper", WEB_SCRAPER),
    ("scrape", WEB_SCRAPER),
    ("web_fetch", WEB_SCRAPER),
    ("crawler", WEB_SCRAPER),
    ("parse_site", WEB_SCRAPER),
    ("fetch_page", WEB_SCRAPER),
    ("download_page", WEB_SCRAPER),
    ("http_request", API_CALL),
    ("rest_api", API_CALL),
    ("api_request", API_CALL),
    ("call_api", API_CALL),
    ("http_client", API_CALL),
    ("api", API_CALL),
    ("search", WEB_SEARCH),
    ("google", WEB_SEARCH),
    ("internet_search", WEB_SEARCH),
    ("search_web", WEB_SEARCH),
    ("find_online", WEB_SEARCH),
    ("codegen", CODE_GENERATOR),
    ("generate_code", CODE_GENERATOR),
    ("write_code", CODE_GENERATOR),
    ("code_writer", CODE_GENERATOR),
    ("analyze_data", DATA_ANALYZER),
    ("data_analysis", DATA_ANALYZER),
    ("analytics", DATA_ANALYZER),
    ("analyzer", DATA_ANALYZER),
    ("translate", TRANSLATOR),
    ("translation", TRANSLATOR),
    ("translate_text", TRANSLATOR),
];

/// Descriptors for every built-in tool.
///
/// Trigger patterns are matched against lower-cased text; extractors run
/// on the original text.
pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(EXECUTE_SHELL, "Run a shell command", 0.9)
            .with_triggers([
                r"\b(?:run|execute|exec)\s+(?:the\s+|this\s+)?(?:command|shell|script)\b",
                r"\b(?:in|from)\s+(?:the\s+)?(?:terminal|shell|console)\b",
                r"\b(?:выполни|запусти|исполни)\w*",
                r"\bв\s+(?:терминале|консоли)\b",
                r"^\s*\$\s+\S",
            ])
            .with_extractor(
                "command",
                [
                    r"`([^`]+)`",
                    r"(?:выполни|запусти|исполни)\w*\s+(?:команду\s+)?(.+)",
                    r"\b(?:run|execute|exec)\s+(?:the\s+|this\s+)?(?:shell\s+)?(?:command\s*:?\s+)?(.+)",
                    r"^\s*\$\s+(.+)",
                ],
            ),
        ToolDescriptor::new(FILE_OPERATIONS, "Read, write or list files", 0.8)
            .with_triggers([
                r"\b(?:read|open|show|cat|view)\s+(?:the\s+|this\s+)?file\b",
                r"\b(?:write|save|create)\s+(?:a\s+|the\s+|to\s+(?:a\s+|the\s+)?)?file\b",
                r"\blist\s+(?:the\s+|all\s+)?(?:files|directory|folder)\b",
                r"\b(?:прочитай|открой|покажи)\s+файл\w*",
                r"\b(?:запиши|сохрани|создай)\s+(?:в\s+)?файл\w*",
                r"\bсодержимое\s+(?:папки|каталога|директории)\b",
            ])
            .with_extractor(
                "path",
                [
                    r#"\b(?:file|folder|directory|файл\w*|папк\w*|каталог\w*)\s+["']?([^\s"']+)"#,
                    r#"["']([^"'\s]*[/\\][^"']*)["']"#,
                ],
            )
            .with_extractor("operation", [r"\b(read|write|list)\b"]),
        ToolDescriptor::new(WEB_SCRAPER, "Fetch a web page and extract its text", 0.8)
            .with_triggers([
                r"\b(?:scrape|crawl)\w*",
                r"\bparse\s+(?:the\s+)?(?:page|site|website|html)\b",
                r"\b(?:download|fetch)\s+(?:the\s+)?(?:page|site|website|html|content)\b",
                r"\b(?:скачай|скачать|спарси\w*|распарси\w*)",
                r"\bсодержимое\s+(?:страницы|сайта)\b",
            ])
            .with_extractor("url", [URL_PATTERN]),
        ToolDescriptor::new(API_CALL, "Call an HTTP API endpoint", 0.75)
            .with_triggers([
                r"\b(?:api|endpoint|rest)\b",
                r"\b(?:get|post|put|patch|delete)\s+(?:request\s+)?(?:to\s+)?https?://",
                r"\bhttp\s+(?:request|запрос)\b",
                r"\b(?:вызови|дёрни|дерни)\s+(?:api|эндпоинт)",
                r"\bзапрос\w*\s+к\s+(?:api|апи)\b",
            ])
            .with_extractor("url", [URL_PATTERN])
            .with_extractor("method", [r"\b(GET|POST|PUT|PATCH|DELETE|HEAD)\s+https?://"]),
        ToolDescriptor::new(WEB_SEARCH, "Search the web", 0.8)
            .with_triggers([
                r"\bsearch\s+(?:the\s+web|online|the\s+internet|for)\b",
                r"\b(?:google|look\s+up)\b",
                r"\bfind\s+(?:information|info)\b",
                r"\b(?:найди|поищи|загугли)\w*",
                r"\bпоиск\w*\s+в\s+интернете\b",
            ])
            .with_extractor(
                "query",
                [
                    r"\bsearch\s+(?:the\s+web\s+|online\s+|the\s+internet\s+)?for\s+(.+)",
                    r"\b(?:google|look\s+up)\s+(.+)",
                    r"\b(?:найди|поищи|загугли)\w*\s+(?:в\s+интернете\s+)?(.+)",
                ],
            ),
        ToolDescriptor::new(CODE_GENERATOR, "Generate source code", 0.75)
            .with_triggers([
                r"\b(?:write|generate|create)\s+(?:a\s+|an\s+|some\s+)?(?:\w+\s+)?(?:code|function|script|class|program)\b",
                r"\b(?:напиши|сгенерируй|создай)\s+(?:\w+\s+)?(?:код|функци\w*|скрипт\w*|класс\w*|программ\w*)",
            ])
            .with_extractor(
                "language",
                [r"\b(python|rust|javascript|typescript|java|golang|ruby|bash|sql|kotlin|swift)\b"],
            )
            .with_extractor(
                "description",
                [
                    r"\b(?:code|function|script|class|program)\s+(?:that|which|to|for)\s+(.+)",
                    r"(?:код|функци\w*|скрипт\w*|программ\w*)\s+(?:которая|который|для|чтобы)\s+(.+)",
                ],
            ),
        ToolDescriptor::new(DATA_ANALYZER, "Analyze a dataset", 0.7)
            .with_triggers([
                r"\banaly[sz]e\b",
                r"\banalysis\b",
                r"\bstatistics?\b",
                r"\bпроанализируй\w*",
                r"\bанализ\w*",
                r"\bстатистик\w*",
            ])
            .with_extractor(
                "source",
                [
                    r"\banaly[sz]e\s+(?:the\s+)?(?:data\s+(?:in|from)\s+)?(.+)",
                    r"\bпроанализируй\w*\s+(?:данные\s+(?:из|в)\s+)?(.+)",
                ],
            ),
        ToolDescriptor::new(TRANSLATOR, "Translate text between languages", 0.8)
            .with_triggers([r"\btranslat\w*", r"\bпереведи\w*", r"\bперевод\w*"])
            .with_extractor(
                "target_language",
                [
                    r"\b(?:to|into)\s+(english|russian|german|french|spanish|chinese|japanese|italian)\b",
                    r"\bна\s+(английский|русский|немецкий|французский|испанский|китайский|японский|итальянский)\b",
                ],
            )
            .with_extractor(
                "text",
                [
                    r#"["«“]([^"»”]+)["»”]"#,
                    r"\b(?:translate|переведи)\s+(.+?)\s+(?:to|into|на)\s+\w+\s*$",
                ],
            ),
    ]
}

/// Alias resolver preloaded with every catalog tool and alias
pub fn default_alias_resolver() -> AliasResolver {
    let mut resolver = AliasResolver::new();
    for tool in CANONICAL_TOOLS {
        resolver.register_tool(tool);
    }
    resolver.register_aliases(DEFAULT_ALIASES.iter().copied());
    resolver
}

/// Intent recognizer over the catalog descriptors.
///
/// # Panics
///
/// Only if a catalog pattern fails to compile, which the tests rule out.
pub fn default_intent_recognizer() -> IntentRecognizer {
    IntentRecognizer::new(descriptors()).expect("built-in tool patterns must compile")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_patterns_compile() {
        assert!(IntentRecognizer::new(descriptors()).is_ok());
    }

    #[test]
    fn test_every_alias_targets_a_catalog_tool() {
        for (alias, canonical) in DEFAULT_ALIASES {
            assert!(
                CANONICAL_TOOLS.contains(canonical),
                "alias {} targets unknown tool {}",
                alias,
                canonical
            );
        }
    }

    #[test]
    fn test_descriptors_cover_catalog() {
        let names: Vec<String> = descriptors().into_iter().map(|d| d.canonical_name).collect();
        assert_eq!(names, CANONICAL_TOOLS);
    }

    #[test]
    fn test_default_resolver_knows_every_tool() {
        let resolver = default_alias_resolver();
        for tool in CANONICAL_TOOLS {
            assert_eq!(resolver.normalize(tool), Some(*tool));
        }
        assert_eq!(resolver.normalize("Run_Command"), Some(EXECUTE_SHELL));
    }
}
