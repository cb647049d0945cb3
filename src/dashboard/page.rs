use crate::dashboard::chart::bar_chart;
use crate::dashboard::chart::line_chart;
use crate::dashboard::chart::pie_chart;
use crate::dashboard::chart::BLUES_REVERSED;
use crate::dashboard::chart::PLOTLY;
use crate::dashboard::chart::SET3;
use crate::dashboard::filter::FILTER_MARKER;
use crate::dashboard::filter::REGION_PARAMETER;
use crate::dashboard::filter::SPORT_PARAMETER;
use crate::dashboard::view::DashboardView;
use crate::roster::aggregate::CategoryCount;
use quick_xml::escape::escape;

const STYLE: &str = "body{font-family:sans-serif;margin:0;color:#222}\
.layout{display:flex}\
aside{width:260px;padding:16px;background:#f0f2f6;min-height:100vh;box-sizing:border-box}\
aside select{width:100%;min-height:160px}\
main{flex:1;padding:16px 32px}\
h1{text-align:center;color:#0066CC}\
.banner{padding:10px 14px;border-radius:6px;margin:12px 0}\
.success{background:#e6f4ea;color:#1e6b34}\
.error{background:#fdecea;color:#8a1c12}\
.info{background:#e8f0fe;color:#1a4fa0}\
.metrics{display:grid;grid-template-columns:repeat(4,1fr);gap:16px}\
.metric .label{font-size:14px;color:#555}\
.metric .value{font-size:36px}\
.charts{display:grid;grid-template-columns:repeat(2,1fr);gap:24px}\
.chart{width:100%;height:auto}\
.chart-title{font-size:16px}\
.tick,.category,.value,.slice-label{font-size:11px}\
.grid{stroke:#e5e5e5}\
.detail{max-height:400px;overflow:auto;border:1px solid #ddd}\
table{border-collapse:collapse;width:100%;font-size:13px}\
th,td{border-bottom:1px solid #eee;padding:4px 8px;text-align:left;white-space:nowrap}\
th{position:sticky;top:0;background:#fafafa}\
footer{color:#777;font-size:13px;margin-top:12px}";

fn open_page(html: &mut String, title: &str) {
    html.push_str(&format!(
        "<!doctype html><html lang=\"id\"><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{title}</title><style>{STYLE}</style></head><body>",
        title = escape(title)
    ));
}

fn heading(html: &mut String, title: &str) {
    html.push_str(&format!("<h1>🏅 {}</h1><hr>", escape(title)));
}

fn banner(html: &mut String, class: &str, message: &str) {
    html.push_str(&format!("<div class=\"banner {class}\">{}</div>", escape(message)));
}

fn multi_select(html: &mut String, label: &str, name: &str, options: &[String], selected: impl Fn(&str) -> bool) {
    html.push_str(&format!("<label for=\"{name}\">{}</label><select id=\"{name}\" name=\"{name}\" multiple>", escape(label)));
    for option in options {
        let marker = if selected(option) { " selected" } else { "" };
        let option = escape(option);
        html.push_str(&format!("<option value=\"{option}\"{marker}>{option}</option>"));
    }
    html.push_str("</select>");
}

fn sidebar(html: &mut String, view: &DashboardView) {
    html.push_str("<aside><h2>Filter Data</h2><form method=\"get\" action=\"/dashboard\">");
    html.push_str(&format!("<input type=\"hidden\" name=\"{FILTER_MARKER}\" value=\"1\">"));
    multi_select(html, "Pilih Wilayah Domisili:", REGION_PARAMETER, &view.region_options, |value| {
        view.selection.region_selected(value)
    });
    multi_select(html, "Pilih Cabang Olahraga:", SPORT_PARAMETER, &view.sport_options, |value| {
        view.selection.sport_selected(value)
    });
    html.push_str("<p><button type=\"submit\">Terapkan Filter</button> <a href=\"/dashboard\">Pilih Semua</a></p></form>");
    html.push_str("<form method=\"post\" action=\"/dashboard/reload\"><button type=\"submit\">Muat Ulang Data</button></form></aside>");
}

fn metrics(html: &mut String, view: &DashboardView) {
    html.push_str("<h2>📊 Statistik Utama</h2><div class=\"metrics\">");
    for (label, value) in [
        ("Total Atlet", view.counters.athletes),
        ("Cabang Olahraga", view.counters.sports),
        ("Kategori Ketunaan", view.counters.categories),
        ("Wilayah Domisili", view.counters.regions),
    ] {
        html.push_str(&format!(
            "<div class=\"metric\"><div class=\"label\">{label}</div><div class=\"value\">{value}</div></div>"
        ));
    }
    html.push_str("</div><hr>");
}

fn chart_cell(html: &mut String, chart: Option<String>) {
    html.push_str("<div>");
    if let Some(chart) = chart {
        html.push_str(&chart);
    }
    html.push_str("</div>");
}

fn charts(html: &mut String, view: &DashboardView) {
    let bars = |counts: &Option<Vec<CategoryCount>>, title: &str, axis: &str, palette: &[&str]| {
        counts.as_ref().map(|counts| bar_chart(title, axis, counts, palette))
    };

    html.push_str("<div class=\"charts\">");
    chart_cell(
        html,
        view.genders
            .as_ref()
            .map(|counts| pie_chart("Distribusi Atlet Berdasarkan Jenis Kelamin", counts, &SET3)),
    );
    chart_cell(html, bars(&view.sports, "Jumlah Atlet per Cabang Olahraga", "Cabang Olahraga", &SET3[..]));
    html.push_str("</div><h2>Distribusi Berdasarkan Ketunaan dan Wilayah</h2><div class=\"charts\">");
    chart_cell(html, bars(&view.categories, "Atlet Berdasarkan Kategori Ketunaan", "Kategori Ketunaan", &PLOTLY[..]));
    chart_cell(
        html,
        bars(&view.regions, "Sebaran Atlet Berdasarkan Wilayah Domisili", "Wilayah Domisili", &BLUES_REVERSED[..]),
    );
    html.push_str("</div>");

    if let Some(years) = &view.years {
        html.push_str("<div class=\"period\">");
        html.push_str(&line_chart("Jumlah Atlet per Periode Data (Tahun)", "Periode (Tahun)", years));
        html.push_str("</div>");
    }
    for notice in &view.notices {
        banner(html, "info", notice);
    }
}

fn detail_table(html: &mut String, view: &DashboardView) {
    html.push_str("<h2>📋 Detail Data Atlet</h2><div class=\"detail\"><table><thead><tr><th></th>");
    for column in view.filtered.columns() {
        html.push_str(&format!("<th>{}</th>", escape(column)));
    }
    html.push_str("</tr></thead><tbody>");
    for (index, row) in view.filtered.rows().enumerate() {
        html.push_str(&format!("<tr><th>{index}</th>"));
        for (_, value) in row.fields() {
            html.push_str(&format!("<td>{}</td>", escape(&value.to_string())));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table></div>");
}

fn close_page(html: &mut String) {
    html.push_str("<hr><footer>© Dev Dashboard Atlet Disabilitas — Satu Data Jakarta</footer></main></div></body></html>");
}

/// Full dashboard page for a loaded roster.
pub fn render(title: &str, file_name: &str, view: &DashboardView) -> String {
    let mut html = String::new();
    open_page(&mut html, title);
    html.push_str("<div class=\"layout\">");
    sidebar(&mut html, view);
    html.push_str("<main>");
    heading(&mut html, title);
    banner(&mut html, "success", &format!("✅ Data berhasil dimuat dari file: {file_name}"));
    metrics(&mut html, view);
    charts(&mut html, view);
    detail_table(&mut html, view);
    close_page(&mut html);
    html
}

/// Page shown when the roster cannot be loaded: heading and error banner only.
pub fn render_error(title: &str, message: &str) -> String {
    let mut html = String::new();
    open_page(&mut html, title);
    html.push_str("<div class=\"layout\"><main>");
    heading(&mut html, title);
    banner(&mut html, "error", &format!("❌ {message}"));
    close_page(&mut html);
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::filter::Selection;
    use crate::roster::schema::RosterSchema;
    use crate::roster::AthleteRecord;
    use crate::roster::AthleteTable;
    use crate::roster::FieldValue;

    fn view() -> DashboardView {
        let table = AthleteTable::new(
            vec![
                "wilayah_domisili".to_string(),
                "cabang_olahraga".to_string(),
                "jenis_kelamin".to_string(),
                "kategori_ketunaan".to_string(),
                "catatan".to_string(),
            ],
            vec![
                AthleteRecord::new(vec![
                    "Jakarta Barat".into(),
                    "Renang".into(),
                    "Putra".into(),
                    "Tuna Netra".into(),
                    "<b>juara</b>".into(),
                ]),
                AthleteRecord::new(vec![
                    "Jakarta Timur".into(),
                    "Catur".into(),
                    "Putri".into(),
                    "Tuna Rungu".into(),
                    FieldValue::Null,
                ]),
            ],
            RosterSchema::new(),
        );
        let selection = Selection {
            regions: Some(["Jakarta Barat".to_string()].into()),
            sports: None,
        };
        DashboardView::build(&table, selection)
    }

    #[test]
    fn page_lists_sections_and_escapes_cells() {
        let html = render("Dashboard", "data-atlet-disabilitas.xlsx", &view());
        assert!(html.contains("Data berhasil dimuat dari file: data-atlet-disabilitas.xlsx"));
        assert!(html.contains("Statistik Utama"));
        assert!(html.contains("Distribusi Atlet Berdasarkan Jenis Kelamin"));
        assert!(html.contains("Kolom &apos;periode_data&apos; tidak ditemukan di dataset."));
        assert!(html.contains("&lt;b&gt;juara&lt;/b&gt;"));
        assert!(!html.contains("<b>juara</b>"));
        assert!(html.contains("<option value=\"Jakarta Barat\" selected>"));
        assert!(html.contains("<option value=\"Jakarta Timur\">"));
    }

    #[test]
    fn error_page_has_only_the_banner() {
        let html = render_error("Dashboard", "File 'x.xlsx' tidak ditemukan.");
        assert!(html.contains("class=\"banner error\""));
        assert!(!html.contains("Statistik Utama"));
    }
}
