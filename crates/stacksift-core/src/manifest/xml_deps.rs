//! Maven `pom.xml`.
//!
//! Streams the document with `quick-xml` and collects `groupId`/`artifactId`
//! pairs from every `<dependency>` element, including those under
//! `<dependencyManagement>`. Each dependency yields `artifactId` and, when a
//! group is declared, `groupId:artifactId`.

use quick_xml::events::Event;
use quick_xml::Reader;

/// Extract Maven dependency identifiers.
pub fn parse(content: &str) -> Vec<String> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut names = Vec::new();
    // Open elements, innermost last. Coordinates count only when their
    // direct parent is `<dependency>`, which skips `<exclusion>` entries.
    let mut path: Vec<String> = Vec::new();
    let mut group_id: Option<String> = None;
    let mut artifact_id: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if name == "dependency" {
                    group_id = None;
                    artifact_id = None;
                }
                path.push(name);
            }
            Ok(Event::End(_)) => {
                if path.pop().as_deref() == Some("dependency") {
                    if let Some(artifact) = artifact_id.take() {
                        if let Some(group) = group_id.take() {
                            names.push(format!("{}:{}", group, artifact));
                        }
                        names.push(artifact);
                    }
                    group_id = None;
                }
            }
            Ok(Event::Text(t)) => {
                let [.., parent, tag] = path.as_slice() else {
                    continue;
                };
                if parent != "dependency" {
                    continue;
                }
                let text = match t.unescape() {
                    Ok(text) => text.trim().to_string(),
                    Err(_) => continue,
                };
                if text.is_empty() {
                    continue;
                }
                match tag.as_str() {
                    "groupId" => group_id = Some(text),
                    "artifactId" => artifact_id = Some(text),
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!("Failed to parse pom.xml: {}", e);
                return Vec::new();
            }
            _ => {}
        }
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pom_dependencies() {
        let content = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <groupId>com.example</groupId>
    <artifactId>test-project</artifactId>
    <version>1.0.0</version>
    <dependencies>
        <dependency>
            <groupId>org.springframework</groupId>
            <artifactId>spring-core</artifactId>
            <version>5.3.21</version>
        </dependency>
        <dependency>
            <groupId>junit</groupId>
            <artifactId>junit</artifactId>
            <scope>test</scope>
        </dependency>
    </dependencies>
</project>"#;
        assert_eq!(
            parse(content),
            vec![
                "org.springframework:spring-core",
                "spring-core",
                "junit:junit",
                "junit",
            ]
        );
    }

    #[test]
    fn test_exclusions_are_not_dependencies() {
        let content = r#"<project>
    <dependencies>
        <dependency>
            <groupId>org.springframework.boot</groupId>
            <artifactId>spring-boot-starter-web</artifactId>
            <exclusions>
                <exclusion>
                    <groupId>org.springframework.boot</groupId>
                    <artifactId>spring-boot-starter-tomcat</artifactId>
                </exclusion>
            </exclusions>
        </dependency>
        <dependency>
            <exclusions>
                <exclusion>
                    <artifactId>commons-logging</artifactId>
                </exclusion>
            </exclusions>
            <artifactId>jetty-server</artifactId>
        </dependency>
    </dependencies>
</project>"#;
        assert_eq!(
            parse(content),
            vec![
                "org.springframework.boot:spring-boot-starter-web",
                "spring-boot-starter-web",
                "jetty-server",
            ]
        );
    }

    #[test]
    fn test_parent_and_plugin_coordinates() {
        let content = r#"<project>
    <parent>
        <groupId>org.springframework.boot</groupId>
        <artifactId>spring-boot-starter-parent</artifactId>
    </parent>
    <build><plugins><plugin>
        <artifactId>maven-compiler-plugin</artifactId>
        <dependencies>
            <dependency><groupId>org.ow2.asm</groupId><artifactId>asm</artifactId></dependency>
        </dependencies>
    </plugin></plugins></build>
</project>"#;
        assert_eq!(parse(content), vec!["org.ow2.asm:asm", "asm"]);
    }

    #[test]
    fn test_project_coordinates_are_not_dependencies() {
        let content = r#"<project><groupId>a</groupId><artifactId>self</artifactId></project>"#;
        assert!(parse(content).is_empty());
    }

    #[test]
    fn test_malformed_xml_is_empty() {
        let content = "<project><dependencies><dependency><artifactId>x</groupId>";
        assert!(parse(content).is_empty());
    }
}
