//! Static HTML for the viewer and calibration pages.

/// Full-viewport viewer, scaled to cover the screen.
pub const INDEX: &str = r#"<!doctype html><title>roicast</title>
<style>html,body{margin:0;height:100%}
img{width:100vw;height:100vh;object-fit:cover;display:block;background:#000}</style>
<img src="/stream.mjpg" alt="window stream">
"#;

/// Same stream through an `<object>` tag for embedders that prefer it.
pub const VIEW_OBJECT: &str = r#"<!doctype html><title>roicast (object)</title>
<style>html,body{height:100%;margin:0;background:#111} object{width:100%;height:100%}</style>
<object data="/stream.mjpg" type="image/jpeg"></object>
"#;

pub const META_REFRESH_SECS: f64 = 0.2;

/// Script-free viewer that reloads a snapshot every [`META_REFRESH_SECS`].
pub fn view_meta(timestamp_ms: i64) -> String {
    format!(
        r#"<!doctype html><title>roicast (meta refresh)</title>
<meta http-equiv="refresh" content="{refresh}; url=/view_meta">
<style>html,body{{height:100%;margin:0;background:#111;display:grid;place-items:center}}
img{{max-width:100vw;max-height:100vh}}
.note{{position:fixed;top:10px;left:10px;color:#aaa;font:14px/1.4 system-ui,sans-serif}}</style>
<div class="note">Fallback: meta-refresh ~{fps:.1} fps</div>
<img src="/snapshot.jpg?ts={timestamp_ms}" alt="snapshot">
"#,
        refresh = META_REFRESH_SECS,
        fps = 1.0 / META_REFRESH_SECS,
    )
}

/// Click two corners on the full-window image to get ROI values, optionally
/// applying them live through `/set_roi`.
pub const MEASURE: &str = r#"<!doctype html>
<title>ROI Calibrator</title>
<style>
  html,body{height:100%;margin:0;background:#111;color:#ddd;font:14px/1.4 system-ui,sans-serif}
  .wrap{display:grid;grid-template-columns:1fr 360px;gap:12px;height:100%}
  .pane{display:grid;place-items:center;overflow:auto}
  #img{max-width:100%;height:auto;cursor:crosshair;background:#000}
  .side{padding:12px}
  pre{white-space:pre-wrap;background:#1e1e1e;padding:10px;border-radius:8px}
  .btn{display:inline-block;padding:6px 10px;margin-right:8px;border:1px solid #444;border-radius:8px;cursor:pointer}
  .btn:hover{background:#222}
  .row{margin-bottom:8px}
  code{color:#a6e22e}
</style>
<div class="wrap">
  <div class="pane">
    <img id="img" alt="full window">
  </div>
  <div class="side">
    <div class="row">
      <span class="btn" id="refresh">Refresh</span>
      <span class="btn" id="reset">Reset clicks</span>
    </div>
    <div class="row">
      <strong>Mouse:</strong>
      <div>pixel: <code id="pix">(x,y)</code></div>
      <div>relative: <code id="rel">(l,t)</code></div>
    </div>
    <div class="row">
      <strong>Clicks:</strong>
      <div>1. top-left: <code id="p1">-</code></div>
      <div>2. bottom-right: <code id="p2">-</code></div>
    </div>
    <div class="row">
      <strong>Suggested ROI:</strong>
      <pre id="out">Click two corners on the image to compute the absolute and relative ROI...</pre>
    </div>
    <div class="row">
      <strong>Apply now (optional):</strong><br>
      <span class="btn" id="applyAbs">Apply absolute</span>
      <span class="btn" id="applyRel">Apply relative</span>
      <div id="applyMsg"></div>
    </div>
    <div class="row">
      <strong>Live preview:</strong><br>
      <img id="preview" style="max-width:100%" alt="ROI preview">
    </div>
  </div>
</div>
<script>
const img = document.getElementById('img');
const preview = document.getElementById('preview');
const pix = document.getElementById('pix');
const rel = document.getElementById('rel');
const p1El = document.getElementById('p1');
const p2El = document.getElementById('p2');
const out = document.getElementById('out');
const applyMsg = document.getElementById('applyMsg');
let naturalW = 0, naturalH = 0;
let click1 = null, click2 = null;

function toImage(e){
  const r = img.getBoundingClientRect();
  let x = Math.round((e.clientX - r.left) * (naturalW / r.width));
  let y = Math.round((e.clientY - r.top)  * (naturalH / r.height));
  x = Math.max(0, Math.min(naturalW-1, x));
  y = Math.max(0, Math.min(naturalH-1, y));
  return {x, y};
}

function corners(){
  return {
    x0: Math.min(click1.x, click2.x), y0: Math.min(click1.y, click2.y),
    x1: Math.max(click1.x, click2.x), y1: Math.max(click1.y, click2.y),
  };
}

function showOutput(){
  if (!click1 || !click2) { out.textContent = "Click two corners on the image to compute the absolute and relative ROI..."; return; }
  const {x0, y0, x1, y1} = corners();
  const l = (x0 / naturalW).toFixed(6), t = (y0 / naturalH).toFixed(6);
  const r = (x1 / naturalW).toFixed(6), b = (y1 / naturalH).toFixed(6);
  out.textContent =
`absolute = (${x0}, ${y0}, ${x1 - x0}, ${y1 - y0})
relative = (${l}, ${t}, ${r}, ${b})`;
}

img.addEventListener('mousemove', (e)=>{
  if (!naturalW || !naturalH) return;
  const {x, y} = toImage(e);
  pix.textContent = `(${x}, ${y})`;
  rel.textContent = `(${(x / naturalW).toFixed(4)}, ${(y / naturalH).toFixed(4)})`;
});

img.addEventListener('click', (e)=>{
  if (!naturalW || !naturalH) return;
  const p = toImage(e);
  if (!click1) { click1 = p; p1El.textContent = `(${p.x}, ${p.y})`; }
  else { click2 = p; p2El.textContent = `(${p.x}, ${p.y})`; }
  showOutput();
});

document.getElementById('reset').onclick = ()=>{
  click1 = click2 = null; p1El.textContent='-'; p2El.textContent='-'; showOutput();
};
function refresh(){ img.src = '/full_window.jpg?ts=' + Date.now(); }
document.getElementById('refresh').onclick = refresh;

async function apply(mode){
  if (!click1 || !click2) { applyMsg.textContent = "Click two corners first."; return; }
  const {x0, y0, x1, y1} = corners();
  const qs = new URLSearchParams({mode});
  if (mode === 'absolute') {
    qs.set('x', x0); qs.set('y', y0); qs.set('w', x1 - x0); qs.set('h', y1 - y0);
  } else {
    qs.set('l', x0/naturalW); qs.set('t', y0/naturalH);
    qs.set('r', x1/naturalW); qs.set('b', y1/naturalH);
  }
  const res = await fetch('/set_roi?' + qs.toString());
  const data = await res.json();
  applyMsg.textContent = data.message || 'OK';
}
document.getElementById('applyAbs').onclick = ()=>apply('absolute');
document.getElementById('applyRel').onclick = ()=>apply('relative');

img.addEventListener('load', ()=>{ naturalW = img.naturalWidth; naturalH = img.naturalHeight; });
setInterval(()=>{ preview.src = '/snapshot.jpg?ts=' + Date.now(); }, 1000);
refresh();
</script>
"#;
