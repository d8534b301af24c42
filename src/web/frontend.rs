//! Embedded HTML/JS frontend for the growthboard dashboard.
//!
//! Both files are compiled into the binary so the server runs with no asset
//! directory at all; a deployed `public/` directory overrides them file by
//! file (see `web::assets`). The dashboard script mirrors the Rust chart
//! orchestrator: an explicit slot → initializer table, a data-bound pass on
//! fetch, and a DOM-ready safety-net pass with placeholder data that never
//! overwrites a successfully rendered chart.

/// The dashboard page: five chart cards plus the AI insight box.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>growthboard</title>
<style>
:root {
  --bg: #0d1210;
  --surface: #141b17;
  --border: #23302a;
  --text: #e8ffe8;
  --text-muted: #8fae99;
  --accent: #1db954;
  --accent-soft: #a0e4af;
  --red: #ff7777;
  --radius: 10px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.app { max-width: 1100px; margin: 0 auto; padding: 24px; }

header {
  display: flex;
  align-items: baseline;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}
header h1 { font-size: 22px; font-weight: 600; }
header h1 span { color: var(--accent); }
header .subtitle { color: var(--text-muted); font-size: 13px; }

.grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(420px, 1fr));
  gap: 16px;
}

.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px;
}
.card.wide { grid-column: 1 / -1; }
.card canvas { width: 100%; }

.insight { margin-top: 24px; }
.insight h2 { font-size: 16px; margin-bottom: 10px; }
.insight .row { display: flex; gap: 8px; }
.insight input {
  flex: 1;
  padding: 10px 12px;
  border: 1px solid var(--border);
  border-radius: 6px;
  background: var(--bg);
  color: var(--text);
  font-size: 14px;
}
.insight button {
  padding: 10px 18px;
  border: none;
  border-radius: 6px;
  background: var(--accent);
  color: #04160b;
  font-weight: 600;
  cursor: pointer;
}
.insight button:hover { filter: brightness(1.1); }
#response {
  margin-top: 12px;
  min-height: 40px;
  padding: 12px;
  border: 1px solid var(--border);
  border-radius: 6px;
  color: var(--accent-soft);
  white-space: pre-wrap;
}
</style>
</head>
<body>
<div class="app">
  <header>
    <h1><span>growth</span>board</h1>
    <div class="subtitle">Audiobook growth analytics</div>
  </header>

  <div class="grid">
    <div class="card"><canvas id="listeningChart"></canvas></div>
    <div class="card"><canvas id="conversionChart"></canvas></div>
    <div class="card"><canvas id="abChart"></canvas></div>
    <div class="card"><canvas id="regionChart"></canvas></div>
    <div class="card wide"><canvas id="growthChart"></canvas></div>
  </div>

  <section class="insight card">
    <h2>AI Growth Insight</h2>
    <div class="row">
      <input id="prompt" type="text" placeholder="Ask the growth analyst, e.g. why is audiobook growth accelerating?">
      <button id="generate">Generate</button>
    </div>
    <div id="response">Ask a question to generate an insight.</div>
  </section>
</div>

<script src="https://cdn.jsdelivr.net/npm/chart.js@4"></script>
<script src="https://cdn.jsdelivr.net/npm/chartjs-plugin-datalabels@2"></script>
<script src="/dashboard.js"></script>
</body>
</html>
"##;

/// The dashboard script: chart orchestration plus the insight controller.
pub const DASHBOARD_JS: &str = r##"'use strict';

// ---------------------------------------------------------------------------
// Chart orchestration
//
// Mirrors the server-side orchestrator: five fixed slots, an explicit
// initializer table, a data-bound pass once /api/data resolves, and a
// DOM-ready safety-net pass that fills any slot still empty with a
// placeholder chart. Slots are independent; one broken canvas never stops
// the others.
// ---------------------------------------------------------------------------

const SLOTS = ['listeningChart', 'conversionChart', 'abChart', 'regionChart', 'growthChart'];
const MIN_USABLE_HEIGHT = 200;
const APPLIED_MIN_HEIGHT = 360;

const ACCENT = '#1db954';
const ACCENT_LIGHT = '#84e684';
const TICKS = { color: '#c7f7d2' };

const instances = Object.create(null);
const renderedSlots = new Set();

if (window.Chart && window.ChartDataLabels) {
  Chart.register(ChartDataLabels);
}

function setStatus(msg) {
  const el = document.getElementById('response');
  if (el) el.textContent = msg;
  console.log('Dashboard:', msg);
}

function baseOptions(title, extra) {
  return Object.assign({
    responsive: true,
    plugins: {
      title: { display: true, text: title, color: '#fff' },
      legend: { labels: { color: '#e8ffe8' } },
      datalabels: { display: false }
    },
    scales: {
      y: { beginAtZero: true, ticks: TICKS },
      x: { ticks: TICKS }
    }
  }, extra || {});
}

// Slot initializers. An explicit table, not a window[name] lookup: a slot
// with no entry here degrades to the placeholder chart.
const initializers = {
  listeningChart: (data) => ({
    type: 'line',
    data: {
      labels: ['Mon', 'Tue', 'Wed', 'Thu', 'Fri', 'Sat', 'Sun'],
      datasets: [{
        label: 'Listening Time (min)',
        data: data.weeklyListening,
        borderColor: ACCENT,
        backgroundColor: 'rgba(29,185,84,0.25)',
        borderWidth: 2.5,
        tension: 0.4,
        fill: true
      }]
    },
    options: baseOptions('Weekly Listening Momentum')
  }),

  conversionChart: (data) => {
    const a = (data.campaignData.versionA || {}).conversions || 0;
    const b = (data.campaignData.versionB || {}).conversions || 0;
    return {
      type: 'bar',
      data: {
        labels: ['Version A', 'Version B'],
        datasets: [{
          label: 'Conversions',
          data: [a, b],
          backgroundColor: ['rgba(85,85,85,0.75)', 'rgba(29,185,84,0.85)'],
          borderColor: ['#555', ACCENT],
          borderWidth: 1.5,
          borderRadius: 12
        }]
      },
      options: baseOptions('A/B Campaign Performance')
    };
  },

  abChart: (data) => {
    const a = (data.campaignData.versionA || {}).conversions || 0;
    const b = (data.campaignData.versionB || {}).conversions || 0;
    return {
      type: 'doughnut',
      data: {
        labels: ['Version A', 'Version B'],
        datasets: [{
          data: [a, b],
          backgroundColor: [ACCENT, ACCENT_LIGHT],
          borderColor: '#0d1210',
          borderWidth: 3
        }]
      },
      options: {
        cutout: '55%',
        plugins: {
          title: { display: true, text: 'Campaign Conversion Share', color: '#fff' },
          legend: { position: 'bottom', labels: { color: '#e8ffe8' } },
          datalabels: { display: false }
        }
      }
    };
  },

  regionChart: (data) => {
    const regions = data.regions || {};
    if (Object.keys(regions).length === 0) {
      throw new Error('no regional growth data');
    }
    return {
      type: 'bar',
      data: {
        labels: Object.keys(regions),
        datasets: [{
          label: 'Growth (%)',
          data: Object.values(regions),
          backgroundColor: [ACCENT, '#1ed760', '#9fffb0', '#68ff9f', '#2fd479'],
          borderColor: '#0b2e1a',
          borderWidth: 1.2,
          borderRadius: 10
        }]
      },
      options: baseOptions('Fastest-Growing Audiobook Markets', {
        indexAxis: 'y',
        plugins: {
          title: { display: true, text: 'Fastest-Growing Audiobook Markets', color: '#fff' },
          legend: { display: false },
          datalabels: {
            color: '#fff',
            anchor: 'end',
            align: 'right',
            formatter: (val) => val + '%'
          }
        },
        scales: {
          x: { beginAtZero: true, max: 40, ticks: TICKS },
          y: { ticks: TICKS }
        }
      })
    };
  },

  growthChart: () => ({
    type: 'line',
    data: {
      labels: ['2023', '2024', '2025'],
      datasets: [
        {
          label: 'Audiobook Listeners (YoY % Growth)',
          data: [100, 136, 185],
          borderColor: ACCENT,
          backgroundColor: 'rgba(132,230,132,0.25)',
          borderWidth: 3,
          fill: true,
          tension: 0.35
        },
        {
          label: 'Listening Hours (YoY % Growth)',
          data: [100, 137, 187],
          borderColor: ACCENT_LIGHT,
          backgroundColor: 'rgba(132,230,132,0.1)',
          borderWidth: 2,
          fill: false,
          tension: 0.35
        }
      ]
    },
    options: baseOptions('Audiobook Listener Growth Over Time (2023-2025)')
  })
};

function fallbackConfig(id) {
  return {
    type: 'bar',
    data: {
      labels: ['A', 'B', 'C'],
      datasets: [{
        label: id + ' (fallback)',
        data: [1, 2, 3],
        backgroundColor: ['rgba(29,185,84,0.9)', 'rgba(29,185,84,0.7)', 'rgba(29,185,84,0.5)'],
        borderColor: 'rgba(29,185,84,1)',
        borderWidth: 1
      }]
    },
    options: {
      maintainAspectRatio: false,
      responsive: true,
      plugins: {
        title: { display: true, text: id + ' (fallback)', color: '#fff' },
        datalabels: { display: false }
      },
      scales: { y: { ticks: TICKS }, x: { ticks: TICKS } }
    }
  };
}

// Canvas presence, min-height policy, and 2D context. Returns the context
// or null after reporting the failure.
function prepareCanvas(id) {
  const canvas = document.getElementById(id);
  if (!canvas) {
    setStatus('Canvas not found: ' + id);
    return null;
  }
  if (canvas.clientHeight < MIN_USABLE_HEIGHT) {
    canvas.style.minHeight = canvas.style.minHeight || APPLIED_MIN_HEIGHT + 'px';
    canvas.style.height = canvas.style.height || APPLIED_MIN_HEIGHT + 'px';
  }
  const ctx = canvas.getContext && canvas.getContext('2d');
  if (!ctx) {
    setStatus('Canvas context error for ' + id);
    return null;
  }
  return ctx;
}

// Destroy any prior instance before attaching, so re-running a pass never
// stacks two charts on one canvas.
function attach(id, ctx, config) {
  if (instances[id]) {
    try { instances[id].destroy(); } catch (_) {}
    delete instances[id];
  }
  instances[id] = new Chart(ctx, config);
}

function attachFallback(id, ctx) {
  try {
    attach(id, ctx, fallbackConfig(id));
  } catch (err) {
    console.error('Failed to create chart for ' + id + ':', err);
    setStatus('Failed to create chart for ' + id + ': ' + err.message);
  }
}

// Primary pass: bind the fetched payload through the initializer table.
function dataPass(data) {
  for (const id of SLOTS) {
    const ctx = prepareCanvas(id);
    if (!ctx) continue;

    const init = initializers[id];
    if (!init) {
      attachFallback(id, ctx);
      continue;
    }

    try {
      attach(id, ctx, init(data));
      renderedSlots.add(id);
    } catch (err) {
      console.error('Error initializing ' + id + ':', err);
      setStatus('Error initializing ' + id + ': ' + err.message);
      attachFallback(id, ctx);
    }
  }
}

// Safety-net pass: runs on DOM-ready regardless of fetch state, giving
// every still-empty slot a placeholder chart. Slots the data pass rendered
// are left untouched.
function safetyNetPass() {
  for (const id of SLOTS) {
    if (renderedSlots.has(id)) continue;
    const ctx = prepareCanvas(id);
    if (!ctx) continue;
    attachFallback(id, ctx);
  }
  const attached = SLOTS.filter((id) => instances[id]).length;
  setStatus('Chart initialization attempted: ' + attached + ' of ' + SLOTS.length + ' slots have a chart.');
}

fetch('/api/data')
  .then((res) => res.json())
  .then((data) => dataPass(data))
  .catch((err) => console.error('Error fetching analytics data:', err));

document.addEventListener('DOMContentLoaded', safetyNetPass);

// ---------------------------------------------------------------------------
// Insight controller
//
// Last write wins: a second click before the first reply lands simply
// overwrites the status box whenever each request settles.
// ---------------------------------------------------------------------------

document.getElementById('generate').addEventListener('click', async () => {
  const message = document.getElementById('prompt').value;
  const responseBox = document.getElementById('response');

  responseBox.textContent = 'Thinking...';
  responseBox.style.color = '#8fae99';

  try {
    const res = await fetch('/api/insight', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ message })
    });
    const data = await res.json();
    responseBox.textContent = data.reply;
    responseBox.style.color = res.ok ? '#a0e4af' : '#ff7777';
  } catch (err) {
    responseBox.textContent = 'Error generating insight.';
    responseBox.style.color = '#ff7777';
  }
});
"##;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartSlot;

    #[test]
    fn page_has_a_canvas_for_every_slot() {
        for slot in ChartSlot::all() {
            let marker = format!("id=\"{}\"", slot.id());
            assert!(INDEX_HTML.contains(&marker), "missing canvas for {slot}");
        }
    }

    #[test]
    fn page_has_the_insight_controls() {
        assert!(INDEX_HTML.contains("id=\"prompt\""));
        assert!(INDEX_HTML.contains("id=\"generate\""));
        assert!(INDEX_HTML.contains("id=\"response\""));
        assert!(INDEX_HTML.contains("/dashboard.js"));
    }

    #[test]
    fn script_mirrors_the_orchestrator_constants() {
        assert!(DASHBOARD_JS.contains("MIN_USABLE_HEIGHT = 200"));
        assert!(DASHBOARD_JS.contains("APPLIED_MIN_HEIGHT = 360"));
        for slot in ChartSlot::all() {
            assert!(DASHBOARD_JS.contains(slot.id()), "script missing {slot}");
        }
    }

    #[test]
    fn script_uses_the_two_api_routes() {
        assert!(DASHBOARD_JS.contains("fetch('/api/data')"));
        assert!(DASHBOARD_JS.contains("fetch('/api/insight'"));
    }
}
