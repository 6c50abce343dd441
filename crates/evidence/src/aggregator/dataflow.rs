//! data-flow 노드를 호출 스택 프레임과 해석 대상 타입으로 변환

use crate::sbom::Frame;
use crate::slices::DataFlowNode;
use crate::types::Language;

/// 노드에서 purl 해석에 쓸 타입 이름을 고릅니다.
///
/// JS 계열에서 타입이 `ANY`이면 `new X(...)` 코드나 파라미터/식별자 노드의 코드에서
/// 타입을 추정하고, 그것도 안 되면 fullName/name을 씁니다.
pub(crate) fn node_type(language: Language, node: &DataFlowNode) -> Option<String> {
    let type_full_name = node.type_full_name.as_deref();
    if !(language.is_javascript() && type_full_name == Some("ANY")) {
        return type_full_name.map(str::to_owned);
    }

    let code = node.code.as_deref().filter(|c| !c.is_empty());
    let from_code = code.filter(|c| {
        c.starts_with("new ")
            || matches!(
                node.label.as_deref(),
                Some("METHOD_PARAMETER_IN") | Some("IDENTIFIER")
            )
    });
    match from_code {
        Some(code) => {
            let head = code.split('(').next().unwrap_or_default();
            Some(head.replacen("new ", "", 1))
        }
        None => node
            .full_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(node.name.as_deref())
            .map(str::to_owned),
    }
}

/// 노드를 표시용 프레임으로 변환합니다.
pub(crate) fn node_frame(node: &DataFlowNode) -> Frame {
    let class_name = node.parent_class_name.clone().unwrap_or_default();
    let mut package = node.parent_package_name.clone().unwrap_or_default();

    // 전역 스코프의 JS 모듈은 클래스 이름 앞부분이 파일 경로
    if package == "<global>" && class_name.contains("::") {
        package = class_name.split("::").next().unwrap_or_default().to_owned();
        if package.contains(".js") {
            let mut parts: Vec<&str> = package.split('/').collect();
            if parts.len() > 1 {
                parts.pop();
            }
            package = parts.join("/");
        }
    }

    Frame {
        package,
        module: class_name,
        function: node.parent_method_name.clone().unwrap_or_default(),
        line: node.line_number.filter(|l| *l > 0),
        column: node.column_number.filter(|c| *c > 0),
        full_filename: node.parent_file_name.clone().unwrap_or_default(),
    }
}
