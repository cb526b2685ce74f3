//! 터미널 출력 포맷팅 유틸리티
//!
//! 서비스 기동 과정(레지스트리 초기화, 라우트 목록)을 터미널에 보기 좋게 출력합니다.
//! 포맷팅은 `String`을 돌려주는 함수로 분리해 테스트할 수 있게 두었습니다.

/// 박스 내부 너비
const BOX_WIDTH: usize = 50;

/// 박스 형태로 둘러싼 제목 문자열을 만듭니다.
///
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║                  System Started                  ║
/// ╚══════════════════════════════════════════════════╝
/// ```
pub fn boxed_title(title: &str) -> String {
    let border = "═".repeat(BOX_WIDTH);
    format!("╔{border}╗\n║{title:^width$}║\n╚{border}╝", width = BOX_WIDTH)
}

pub fn print_boxed_title(title: &str) {
    println!("{}", boxed_title(title));
}

pub fn print_step_start(step: u8, description: &str) {
    println!("→ Step {}: {}", step, description);
}

pub fn print_step_complete(step: u8, description: &str, count: usize) {
    println!("✓ Step {}: {} ({} items)", step, description, count);
}

pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

/// 레지스트리 초기화 요약
pub fn print_final_summary(repos: usize, services: usize) {
    println!();
    print_boxed_title("🎉 SERVICE REGISTRY INITIALIZED");
    println!("   📦 Repositories: {}", repos);
    println!("   🔧 Services: {}", services);
    println!("   🚀 Total Components: {}", repos + services);
    println!();
}

/// `(method, path, description)` 목록을 정렬된 표 문자열로 만듭니다.
///
/// ```text
///   GET   /agg/users/age/{age}          $match
///   POST  /agg/users/out-senior-users   $out
/// ```
pub fn route_table(routes: &[(&str, &str, &str)]) -> String {
    let method_width = routes.iter().map(|(m, _, _)| m.len()).max().unwrap_or(0);
    let path_width = routes.iter().map(|(_, p, _)| p.len()).max().unwrap_or(0);

    routes
        .iter()
        .map(|(method, path, description)| {
            format!(
                "  {method:<mw$}  {path:<pw$}  {description}",
                mw = method_width,
                pw = path_width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 등록된 라우트 목록을 출력합니다.
pub fn print_route_table(title: &str, routes: &[(&str, &str, &str)]) {
    print_boxed_title(title);
    println!("{}", route_table(routes));
    println!();
}
