//! HTML渲染
//!
//! 纯字符串拼装，不引入模板引擎。提供页面片段、单页文档、
//! 多页导航壳与错误文档四种渲染。

/// 将LLM合成的页面内容包装为片段
///
/// 片段不含html/head/body标签，供单页文档或多页壳嵌入。
pub fn render_page_fragment(title: &str, body: &str) -> String {
    format!(
        r#"<section class="page-section">
    <h2 class="page-title">{}</h2>
    <div class="page-body">
{}
    </div>
</section>"#,
        escape(title),
        body.trim()
    )
}

/// 渲染单页完整文档
pub fn render_single_document(title: &str, fragment: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <style>
{}
    </style>
</head>
<body>
    <div class="presentation-container">
{}
    </div>
</body>
</html>"#,
        escape(title),
        BASE_CSS,
        fragment
    )
}

/// 合并多个页面片段为带导航的演示文稿
///
/// fragments按页码升序传入，每项为（页码、标题、片段）。
/// 只有第一页初始可见，其余通过导航与翻页按钮切换。
pub fn merge_pages(theme: &str, fragments: &[(usize, String, String)]) -> String {
    let total = fragments.len();

    let nav_items: String = fragments
        .iter()
        .map(|(number, title, _)| {
            format!(
                r##"            <li><a href="#page-{}" onclick="showPage({})">{}</a></li>
"##,
                number,
                number,
                escape(title)
            )
        })
        .collect();

    let sections: String = fragments
        .iter()
        .enumerate()
        .map(|(i, (number, title, fragment))| {
            let display = if i == 0 { "block" } else { "none" };
            format!(
                r#"        <div id="page-{}" class="page-content" style="display: {};">
            <div class="page-header">
                <h1>{}</h1>
                <span class="page-number">Page {} of {}</span>
            </div>
{}
        </div>
"#,
                number,
                display,
                escape(title),
                number,
                total,
                fragment
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{theme}</title>
    <style>
{base_css}
{multi_css}
    </style>
</head>
<body>
    <div class="presentation-container">
        <header class="presentation-header">
            <h1>{theme}</h1>
            <p class="presentation-subtitle">{total} Pages</p>
        </header>
        <nav class="page-navigation">
            <ul>
{nav_items}            </ul>
        </nav>
        <main class="presentation-main">
{sections}        </main>
        <div class="page-controls">
            <button onclick="previousPage()" id="prev-btn">&larr; Previous</button>
            <span class="page-indicator">Page <span id="current-page">1</span> of {total}</span>
            <button onclick="nextPage()" id="next-btn">Next &rarr;</button>
        </div>
    </div>
    <script>
{nav_js}
    </script>
</body>
</html>"#,
        theme = escape(theme),
        base_css = BASE_CSS,
        multi_css = MULTI_PAGE_CSS,
        nav_items = nav_items,
        sections = sections,
        total = total,
        nav_js = nav_js(fragments),
    )
}

/// 渲染错误文档，最终兜底也失败时输出
pub fn render_error_document(message: &str) -> String {
    let fragment = format!(
        r#"<section class="page-section error-section">
    <h2 class="page-title">Generation Failed</h2>
    <div class="page-body"><p>{}</p></div>
</section>"#,
        escape(message)
    );
    render_single_document("Generation Failed", &fragment)
}

/// HTML实体转义，只用于标题等元数据字段，LLM产出的片段原样嵌入
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn nav_js(fragments: &[(usize, String, String)]) -> String {
    let page_numbers: Vec<String> = fragments.iter().map(|(n, _, _)| n.to_string()).collect();
    format!(
        r#"        const pageNumbers = [{}];
        let currentIndex = 0;

        function showPage(number) {{
            const index = pageNumbers.indexOf(number);
            if (index === -1) return;
            pageNumbers.forEach(n => {{
                document.getElementById('page-' + n).style.display = 'none';
            }});
            document.getElementById('page-' + number).style.display = 'block';
            currentIndex = index;
            document.getElementById('current-page').textContent = index + 1;
        }}

        function previousPage() {{
            if (currentIndex > 0) showPage(pageNumbers[currentIndex - 1]);
        }}

        function nextPage() {{
            if (currentIndex < pageNumbers.length - 1) showPage(pageNumbers[currentIndex + 1]);
        }}"#,
        page_numbers.join(", ")
    )
}

const BASE_CSS: &str = r#"        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            min-height: 100vh;
            padding: 20px;
        }
        .presentation-container {
            max-width: 1200px;
            margin: 0 auto;
            background: white;
            border-radius: 10px;
            box-shadow: 0 10px 30px rgba(0,0,0,0.2);
            overflow: hidden;
            padding: 30px;
        }
        .page-section { padding: 20px 0; }
        .page-title { color: #343a40; margin-bottom: 15px; }
        .error-section p { color: #dc3545; }"#;

const MULTI_PAGE_CSS: &str = r#"        .presentation-header {
            background: linear-gradient(135deg, #4facfe 0%, #00f2fe 100%);
            color: white;
            padding: 30px;
            text-align: center;
            border-radius: 10px;
            margin-bottom: 20px;
        }
        .page-navigation ul {
            list-style: none;
            display: flex;
            flex-wrap: wrap;
            gap: 15px;
            padding: 15px 0;
            border-bottom: 1px solid #dee2e6;
        }
        .page-navigation a {
            text-decoration: none;
            color: #007bff;
            padding: 8px 16px;
            border: 1px solid #007bff;
            border-radius: 20px;
        }
        .page-header {
            display: flex;
            justify-content: space-between;
            align-items: baseline;
            margin: 20px 0;
        }
        .page-number { color: #6c757d; font-size: 0.9em; }
        .page-controls {
            display: flex;
            justify-content: center;
            gap: 20px;
            padding: 20px 0;
        }
        .page-controls button {
            padding: 8px 20px;
            border: 1px solid #007bff;
            background: white;
            color: #007bff;
            border-radius: 20px;
            cursor: pointer;
        }"#;
