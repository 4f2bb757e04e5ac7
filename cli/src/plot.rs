use clap::Args;
use eyre::Result;
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use downsampling::{lttb, Ltd};

use crate::io::{read_points, Output, XY};

#[derive(Args, Debug)]
pub struct Opts {
    /// Plot title
    #[clap(long, default_value = "Downsampling Comparison")]
    title: String,

    /// Number of points each downsampled series keeps
    #[clap(long, env = "DOWNSAMPLE_THRESHOLD", default_value_t = 500)]
    threshold: usize,

    /// LTD optimizer budget multiplier
    #[clap(long, env = "DOWNSAMPLE_ITERATION_FACTOR", default_value_t = 10)]
    iteration_factor: usize,

    /// Output file [default: stdout]
    #[clap(long, default_value = "stdout")]
    output: String,

    /// Input files [default: stdin]
    files: Vec<String>,
}

/// One line of the comparison chart.
#[derive(Debug, Serialize)]
pub struct Series {
    pub label: String,
    pub color: &'static str,
    pub points: Vec<[f64; 2]>,
}

impl Series {
    fn new(label: String, color: &'static str, points: &[XY]) -> Self {
        Series {
            label,
            color,
            points: points.iter().map(|p| [p.x, p.y]).collect(),
        }
    }
}

pub async fn plot(opts: &Opts) -> Result<()> {
    let (points, _) = read_points(&opts.files).await?;
    if points.is_empty() {
        eyre::bail!("no data to plot");
    }

    let ltd = Ltd::default().with_iteration_factor(opts.iteration_factor);
    let series = vec![
        Series::new(format!("Raw ({})", points.len()), "#A1CDF4", &points),
        Series::new(
            format!("LTTB ({})", opts.threshold),
            "#E9D758",
            &lttb(&points, opts.threshold)?,
        ),
        Series::new(
            format!("LTD ({})", opts.threshold),
            "#EE7860",
            &ltd.downsample(&points, opts.threshold)?,
        ),
    ];

    let html = generate_plot_html(&opts.title, &series)?;

    let mut output = Output::from_filename(&opts.output).await?;
    output.write_all(html.as_bytes()).await?;
    output.flush().await?;

    Ok(())
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// Renders one panel per series plus an overlay of all of them.
pub fn generate_plot_html(title: &str, series: &[Series]) -> Result<String> {
    // Closing tags inside the embedded JSON would end the script early.
    let series_json = serde_json::to_string(series)?.replace("</", "<\\/");
    let title = escape_html(title);
    Ok(format!(
        r##"<!doctype html>
<html>
<head>
  <title>{title}</title>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <style>
    * {{ box-sizing: border-box; }}
    body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 20px; background: #0f1419; color: #e6edf3; }}
    .container {{ max-width: 1600px; margin: 0 auto; }}
    h1 {{ font-size: 24px; font-weight: 600; margin: 0 0 20px 0; }}
    h2 {{ font-size: 15px; font-weight: 500; margin: 0 0 8px 0; color: #8b949e; }}
    .chart {{ background: #161b22; border: 1px solid #30363d; border-radius: 8px; padding: 20px; margin-bottom: 16px; }}
    canvas {{ width: 100%; }}
    .legend {{ display: flex; gap: 16px; margin-top: 12px; flex-wrap: wrap; font-size: 13px; }}
    .legend-item {{ display: flex; align-items: center; gap: 6px; }}
    .legend-dot {{ width: 10px; height: 10px; border-radius: 50%; }}
  </style>
</head>
<body>
  <div class="container">
    <h1>{title}</h1>
    <div id="panels"></div>
  </div>
  <script>
    const series = {series_json};
    const H = 300;

    let xMin = Infinity, xMax = -Infinity, yMin = Infinity, yMax = -Infinity;
    for (const s of series) {{
      for (const [x, y] of s.points) {{
        if (x < xMin) xMin = x;
        if (x > xMax) xMax = x;
        if (y < yMin) yMin = y;
        if (y > yMax) yMax = y;
      }}
    }}

    function panel(heading, members) {{
      const div = document.createElement('div');
      div.className = 'chart';
      div.innerHTML = '<h2></h2><canvas height="' + H + '"></canvas><div class="legend"></div>';
      div.querySelector('h2').textContent = heading;
      document.getElementById('panels').appendChild(div);
      const legend = div.querySelector('.legend');
      for (const s of members) {{
        const item = document.createElement('div');
        item.className = 'legend-item';
        const dot = document.createElement('span');
        dot.className = 'legend-dot';
        dot.style.background = s.color;
        item.appendChild(dot);
        item.appendChild(document.createTextNode(s.label));
        legend.appendChild(item);
      }}
      return {{ canvas: div.querySelector('canvas'), members }};
    }}

    const panels = series.map(s => panel(s.label, [s]));
    panels.push(panel('All in One', series));

    function draw({{ canvas, members }}) {{
      const ctx = canvas.getContext('2d');
      const dpr = window.devicePixelRatio || 1;
      const rect = canvas.getBoundingClientRect();
      canvas.width = rect.width * dpr;
      canvas.height = H * dpr;
      ctx.scale(dpr, dpr);
      const W = rect.width;
      const pad = {{top: 10, right: 20, bottom: 30, left: 70}};
      const pw = W - pad.left - pad.right;
      const ph = H - pad.top - pad.bottom;

      ctx.clearRect(0, 0, W, H);

      function xToP(x) {{ return pad.left + (x - xMin) / (xMax - xMin || 1) * pw; }}
      function yToP(y) {{ return pad.top + ph - (y - yMin) / (yMax - yMin || 1) * ph; }}

      ctx.strokeStyle = '#30363d';
      ctx.lineWidth = 1;
      ctx.fillStyle = '#8b949e';
      ctx.font = '11px monospace';
      for (let i = 0; i <= 5; i++) {{
        const y = pad.top + (ph / 5) * i;
        ctx.beginPath(); ctx.moveTo(pad.left, y); ctx.lineTo(W - pad.right, y); ctx.stroke();
        ctx.textAlign = 'right';
        ctx.fillText((yMax - (i / 5) * (yMax - yMin)).toPrecision(4), pad.left - 8, y + 4);
        ctx.textAlign = 'center';
        ctx.fillText((xMin + (i / 5) * (xMax - xMin)).toPrecision(4), pad.left + (pw / 5) * i, H - pad.bottom + 18);
      }}

      for (const s of members) {{
        ctx.strokeStyle = s.color;
        ctx.lineWidth = 1;
        ctx.beginPath();
        s.points.forEach(([x, y], i) => {{
          if (i === 0) ctx.moveTo(xToP(x), yToP(y)); else ctx.lineTo(xToP(x), yToP(y));
        }});
        ctx.stroke();
      }}
    }}

    function drawAll() {{ panels.forEach(draw); }}
    drawAll();
    window.addEventListener('resize', drawAll);
  </script>
</body>
</html>"##
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use downsampling::Point;

    #[test]
    fn series_serialize_as_pairs() {
        let s = Series::new(
            "Raw (2)".to_string(),
            "#A1CDF4",
            &[Point::new(0.0, 1.5), Point::new(1.0, -2.0)],
        );
        assert_eq!(
            serde_json::to_string(&s).unwrap(),
            r##"{"label":"Raw (2)","color":"#A1CDF4","points":[[0.0,1.5],[1.0,-2.0]]}"##
        );
    }

    #[test]
    fn html_embeds_title_and_series() {
        let s = Series::new("LTD (3)".to_string(), "#EE7860", &[Point::new(0.0, 0.0)]);
        let html = generate_plot_html("a <b> plot", &[s]).unwrap();
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<title>a &lt;b&gt; plot</title>"));
        assert!(html.contains(r#""label":"LTD (3)""#));
        assert!(html.contains("All in One"));
    }

    #[test]
    fn labels_cannot_close_the_script() {
        let s = Series::new("</script>".to_string(), "#EE7860", &[]);
        let html = generate_plot_html("t", &[s]).unwrap();
        assert_eq!(html.matches("</script>").count(), 1);
    }
}
