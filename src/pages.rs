//! Whole HTML documents for the table and detail views.
//!
//! Markup for tiles and the detail body comes from [`crate::tile`] and
//! [`crate::detail`]; this module wraps it with styles and the browser-side
//! scene host.

use crate::config::{SelectionMode, TableMode};
use crate::dataset::Dataset;
use crate::detail::{not_found_html, DetailPage};
use crate::html::escape;
use crate::layout::{actinides, lanthanides, place_main_grid, SceneLayout};
use crate::selection::{Selection, DETAIL_PATH, STORAGE_SLOT};
use crate::tile::{render_tile, Caption};

pub const FETCH_FAILED_MESSAGE: &str = "Failed to load periodic table data. Please try again later.";
pub const WEBGL_MISSING_MESSAGE: &str = "3D rendering is unavailable in this browser.";
pub const SCENE_HOST_FAILED_MESSAGE: &str = "Three.js failed to load. The 3D view is unavailable.";

const IMPORT_MAP: &str = r##"<script type="importmap">
  {
    "imports": {
      "three": "https://unpkg.com/three@0.160.0/build/three.module.js",
      "three/addons/": "https://unpkg.com/three@0.160.0/examples/jsm/"
    }
  }
</script>"##;

const STYLE: &str = r##"<style>
  html, body { margin: 0; padding: 0; min-height: 100%; background: #0b0c10; color: #e6e6e6; font-family: "Space Grotesk", "Segoe UI", sans-serif; }
  a { color: inherit; text-decoration: none; }
  .topbar { display: flex; align-items: center; justify-content: space-between; padding: 12px 24px; border-bottom: 1px solid #1f2630; }
  .title { font-size: 20px; font-weight: 600; letter-spacing: 0.02em; }
  .nav-btn { background: #11151b; border: 1px solid #2a2f36; color: #e6e6e6; border-radius: 8px; padding: 6px 10px; font-size: 12px; cursor: pointer; }
  .nav-btn:hover, .nav-btn.active { border-color: #3c6a9e; }
  .page { padding: 16px 24px; }
  .periodic-grid { display: grid; grid-template-columns: repeat(18, minmax(0, 1fr)); gap: 4px; }
  .series-row { display: grid; grid-template-columns: 110px repeat(15, minmax(0, 1fr)); gap: 4px; margin-top: 8px; }
  .series-label { font-size: 11px; color: #9aa3ad; align-self: center; }
  .element { min-height: 56px; border-radius: 6px; padding: 4px; background: #11151b; border: 1px solid #2a2f36; display: flex; flex-direction: column; align-items: center; justify-content: center; cursor: pointer; box-sizing: border-box; }
  .element:hover { border-color: #3c6a9e; }
  .element.empty { background: transparent; border: 1px dashed #1e252f; cursor: default; }
  .element-number { font-size: 10px; color: #9aa3ad; align-self: flex-start; }
  .element-symbol { font-size: 18px; font-weight: 600; }
  .element-caption { font-size: 9px; color: #c7cdd6; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; max-width: 100%; }
  .category-alkali-metal { background: #3a1f24; }
  .category-alkaline-earth-metal { background: #3a3020; }
  .category-transition-metal { background: #1f2c3a; }
  .category-post-transition-metal { background: #1f3a31; }
  .category-metalloid { background: #2c2340; }
  .category-diatomic-nonmetal, .category-polyatomic-nonmetal { background: #1d3638; }
  .category-noble-gas { background: #3a2338; }
  .category-lanthanide { background: #22304a; }
  .category-actinide { background: #2e3440; }
  #container { width: 100vw; height: calc(100vh - 58px); overflow: hidden; }
  #container .element { width: 100px; height: 140px; }
  #container .element-symbol { font-size: 42px; }
  #elementInfo { position: absolute; right: 24px; bottom: 24px; width: 240px; background: rgba(10,12,16,0.9); border: 1px solid #2a2f36; border-radius: 10px; padding: 12px; }
  .hidden { display: none; }
  .detail-header { display: flex; align-items: center; gap: 20px; }
  .detail-symbol { font-size: 64px; font-weight: 600; width: 110px; height: 110px; display: flex; align-items: center; justify-content: center; border: 1px solid #2a2f36; border-radius: 12px; }
  .detail-body { display: grid; grid-template-columns: 340px 1fr; gap: 16px; margin-top: 16px; }
  .property { display: flex; justify-content: space-between; gap: 12px; padding: 6px 0; border-bottom: 1px solid #1f2630; font-size: 13px; }
  .property span:first-child { color: #9aa3ad; }
  .bohr-container { min-height: 400px; background: #000; border-radius: 10px; overflow: hidden; }
  .summary { color: #c7cdd6; line-height: 1.6; max-width: 980px; }
  .not-found, .fallback { color: #ff9f43; }
  @media (max-width: 860px) { .detail-body { grid-template-columns: 1fr; } }
</style>"##;

/// Browser-side scene host. Reads the JSON in `#scene-data` and exposes
/// `start()`/`stop()`; `stop()` cancels the frame loop and drops the resize
/// listener, and runs on `pagehide`. Mounting is idempotent: the storage
/// loader and the module itself may both ask for it.
const SCENE_HOST: &str = r##"<script type="module">
  import * as THREE from "three";
  import { OrbitControls } from "three/addons/controls/OrbitControls.js";
  import { GLTFLoader } from "three/addons/loaders/GLTFLoader.js";

  function webglAvailable() {
    try {
      const canvas = document.createElement("canvas");
      return !!(window.WebGLRenderingContext && (canvas.getContext("webgl2") || canvas.getContext("webgl")));
    } catch (e) {
      return false;
    }
  }

  function buildObject(desc) {
    switch (desc.kind) {
      case "sphere":
        return new THREE.Mesh(
          new THREE.SphereGeometry(desc.radius, 32, 32),
          new THREE.MeshPhongMaterial({ color: desc.color, emissive: desc.emissive })
        );
      case "ring": {
        const points = new THREE.EllipseCurve(0, 0, desc.radius, desc.radius).getPoints(desc.segments);
        return new THREE.Line(
          new THREE.BufferGeometry().setFromPoints(points),
          new THREE.LineBasicMaterial({ color: desc.color })
        );
      }
      case "model": {
        const holder = new THREE.Group();
        new GLTFLoader().load(desc.url, (gltf) => {
          gltf.scene.scale.set(desc.scale, desc.scale, desc.scale);
          holder.add(gltf.scene);
        });
        return holder;
      }
      case "ambient_light":
        return new THREE.AmbientLight(desc.color, desc.intensity);
      case "directional_light":
        return new THREE.DirectionalLight(desc.color, desc.intensity);
      default:
        return new THREE.Group();
    }
  }

  function mountScene(container, desc) {
    const width = () => container.clientWidth || 600;
    const height = desc.viewport_height;
    const scene = new THREE.Scene();
    scene.background = new THREE.Color(0x000000);
    const cam = desc.camera;
    const camera = new THREE.PerspectiveCamera(cam.fov, width() / height, cam.near, cam.far);
    camera.position.set(...cam.position);

    const renderer = new THREE.WebGLRenderer({ antialias: true });
    renderer.setSize(width(), height);
    renderer.setPixelRatio(window.devicePixelRatio);
    container.appendChild(renderer.domElement);

    const controls = new OrbitControls(camera, renderer.domElement);
    controls.enableDamping = true;
    controls.dampingFactor = 0.05;
    controls.enablePan = false;
    controls.minDistance = cam.min_distance;
    controls.maxDistance = cam.max_distance;

    const objects = [];
    for (const node of desc.nodes) {
      const obj = buildObject(node.object);
      obj.position.set(...node.position);
      obj.rotation.set(...node.rotation);
      objects[node.id] = obj;
      (node.parent === null ? scene : objects[node.parent]).add(obj);
    }
    const orbits = desc.orbits.map((o) => ({ ...o, obj: objects[o.node] }));
    const spins = desc.spins.map((s) => ({ ...s, obj: objects[s.node] }));

    let frame = null;
    const tick = () => {
      frame = requestAnimationFrame(tick);
      for (const o of orbits) {
        o.angle = (o.angle + o.speed) % desc.angle_wrap;
        o.obj.position.set(o.radius * Math.cos(o.angle), 0, o.radius * Math.sin(o.angle));
      }
      for (const s of spins) {
        s.obj.rotation.y += s.rate;
      }
      controls.update();
      renderer.render(scene, camera);
    };
    const onResize = () => {
      camera.aspect = width() / height;
      camera.updateProjectionMatrix();
      renderer.setSize(width(), height);
    };

    return {
      start() {
        if (frame !== null) return;
        window.addEventListener("resize", onResize);
        tick();
      },
      stop() {
        if (frame !== null) cancelAnimationFrame(frame);
        frame = null;
        window.removeEventListener("resize", onResize);
      },
    };
  }

  window.mountDetailScene = () => {
    const container = document.getElementById("bohr-container");
    const data = document.getElementById("scene-data");
    if (!container || !data || container.dataset.mounted) return;
    container.dataset.mounted = "1";
    container.replaceChildren();
    if (!webglAvailable()) {
      container.innerHTML = '<p class="fallback">__WEBGL_MISSING__</p>';
      return;
    }
    const host = mountScene(container, JSON.parse(data.textContent));
    host.start();
    window.addEventListener("pagehide", () => host.stop(), { once: true });
  };
  window.dispatchEvent(new Event("scene-host-ready"));
  window.mountDetailScene();
</script>"##;

/// Classic script, so it still runs when the three.js module graph fails to
/// load. Module scripts have run by `load`; a missing host means they failed.
const SCENE_HOST_GUARD: &str = r##"<script>
  window.showSceneHostFailure = () => {
    const container = document.getElementById("bohr-container");
    if (!container || container.dataset.mounted) return;
    container.innerHTML = '<p class="fallback">__HOST_FAILED__</p>';
  };
  window.addEventListener("load", () => {
    if (window.mountDetailScene) return;
    window.sceneHostFailed = true;
    console.error("3D scene host did not load");
    window.showSceneHostFailure();
  }, { once: true });
</script>"##;

const STORAGE_DETAIL: &str = r##"<script>
  (async () => {
    const page = document.getElementById("detail-page");
    const key = window.localStorage.getItem("__SLOT__");
    window.localStorage.removeItem("__SLOT__");
    if (!key) {
      page.innerHTML = '__NOT_FOUND__';
      return;
    }
    let res;
    try {
      res = await fetch(`/api/elements/${encodeURIComponent(key)}`);
    } catch (error) {
      console.error("Error loading periodic table data:", error);
      window.alert(__FETCH_FAILED__);
      return;
    }
    try {
      if (res.status === 502) {
        console.error("Error loading periodic table data:", res.status);
        window.alert(__FETCH_FAILED__);
        return;
      }
      if (!res.ok) {
        page.innerHTML = '__NOT_FOUND__';
        return;
      }
      const body = await res.json();
      page.innerHTML = body.html;
      const mount = () => window.mountDetailScene && window.mountDetailScene();
      if (window.mountDetailScene) mount();
      else if (window.sceneHostFailed) window.showSceneHostFailure();
      else window.addEventListener("scene-host-ready", mount, { once: true });
    } catch (error) {
      console.error("Failed to load element:", error);
      page.innerHTML = '__NOT_FOUND__';
    }
  })();
</script>"##;

const STORAGE_SELECT: &str = r##"<script>
  window.selectElement = (tile) => {
    if (tile.dataset.store) {
      window.localStorage.setItem("__SLOT__", tile.dataset.element);
      window.location.href = "__DETAIL__";
    } else if (tile.getAttribute("href")) {
      window.location.href = tile.getAttribute("href");
    }
  };
  document.addEventListener("click", (e) => {
    const tile = e.target.closest(".element[data-store]");
    if (tile && !document.getElementById("container")) window.selectElement(tile);
  });
  document.addEventListener("keydown", (e) => {
    const tile = e.target.closest && e.target.closest(".element[data-store]");
    if (tile && e.key === "Enter" && !document.getElementById("container")) window.selectElement(tile);
  });
</script>"##;

const CSS3D_TABLE: &str = r##"<script type="module">
  import * as THREE from "three";
  import { CSS3DRenderer, CSS3DObject } from "three/addons/renderers/CSS3DRenderer.js";

  const container = document.getElementById("container");
  const info = document.getElementById("elementInfo");
  const camera = new THREE.PerspectiveCamera(45, container.clientWidth / container.clientHeight, 1, 10000);
  camera.position.z = 3000;
  const scene = new THREE.Scene();
  const group = new THREE.Group();
  scene.add(group);

  const renderer = new CSS3DRenderer();
  renderer.setSize(container.clientWidth, container.clientHeight);
  container.appendChild(renderer.domElement);

  for (const tile of document.querySelectorAll("#tiles .element")) {
    tile.addEventListener("click", (e) => {
      e.preventDefault();
      document.getElementById("elName").textContent = tile.dataset.name;
      document.getElementById("elSymbol").textContent = `Symbol: ${tile.dataset.symbol}`;
      document.getElementById("elNumber").textContent = `Atomic Number: ${tile.dataset.number}`;
      info.classList.remove("hidden");
      document.getElementById("viewMore").onclick = () => window.selectElement(tile);
    });
    const obj = new CSS3DObject(tile);
    obj.position.set(Number(tile.dataset.x), Number(tile.dataset.y), 0);
    group.add(obj);
  }

  let frame = null;
  const animate = () => {
    frame = requestAnimationFrame(animate);
    group.rotation.y += 0.001;
    renderer.render(scene, camera);
  };
  const onResize = () => {
    camera.aspect = container.clientWidth / container.clientHeight;
    camera.updateProjectionMatrix();
    renderer.setSize(container.clientWidth, container.clientHeight);
  };
  window.addEventListener("resize", onResize);
  window.addEventListener("pagehide", () => {
    if (frame !== null) cancelAnimationFrame(frame);
    window.removeEventListener("resize", onResize);
  }, { once: true });
  animate();
</script>"##;

fn document(title: &str, body: &str, scripts: &[&str]) -> String {
    let mut html = String::with_capacity(body.len() + STYLE.len() + 4096);
    html.push_str("<!doctype html>\n<html lang=\"en\">\n  <head>\n    <meta charset=\"utf-8\" />\n");
    html.push_str("    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
    html.push_str(&format!("    <title>{}</title>\n", escape(title)));
    html.push_str(STYLE);
    html.push_str(IMPORT_MAP);
    html.push_str("\n  </head>\n  <body>\n");
    html.push_str(body);
    for script in scripts {
        html.push_str(script);
    }
    html.push_str("\n  </body>\n</html>\n");
    html
}

fn topbar(back: bool) -> String {
    let button = if back {
        r#"<a id="back-btn" class="nav-btn" href="/">Back to table</a>"#
    } else {
        r#"<a id="table-btn" class="nav-btn active" href="/">Table</a>"#
    };
    format!(r#"<div class="topbar"><div class="title">Periodic Table</div>{button}</div>"#)
}

fn storage_select_script() -> String {
    STORAGE_SELECT
        .replace("__SLOT__", STORAGE_SLOT)
        .replace("__DETAIL__", DETAIL_PATH)
}

pub fn table_page(dataset: &Dataset, mode: TableMode, selection: &Selection) -> String {
    match mode {
        TableMode::Grid => grid_table_page(dataset, selection),
        TableMode::Css3d => css3d_table_page(dataset, selection),
    }
}

fn grid_table_page(dataset: &Dataset, selection: &Selection) -> String {
    let grid = place_main_grid(dataset);
    let mut body = topbar(false);
    body.push_str(r#"<div class="page"><div id="periodic-page" class="periodic-grid">"#);
    for (row, col, cell) in grid.cells() {
        match cell {
            Some(record) => body.push_str(&render_tile(record, Caption::Name, selection).to_html()),
            None => body.push_str(&format!(
                r#"<div class="element empty" data-row="{row}" data-col="{col}"></div>"#
            )),
        }
    }
    body.push_str("</div>");

    for (id, label, series) in [
        ("lanthanides-row", "Lanthanides", lanthanides(dataset)),
        ("actinides-row", "Actinides", actinides(dataset)),
    ] {
        body.push_str(&format!(
            r#"<div id="{id}" class="series-row"><div class="series-label">{label}</div>"#
        ));
        for record in series {
            body.push_str(&render_tile(record, Caption::Name, selection).to_html());
        }
        body.push_str("</div>");
    }
    body.push_str("</div>");

    let select = storage_select_script();
    let scripts: Vec<&str> = match selection.mode() {
        SelectionMode::Storage => vec![select.as_str()],
        SelectionMode::Query => Vec::new(),
    };
    document("Periodic Table", &body, &scripts)
}

fn css3d_table_page(dataset: &Dataset, selection: &Selection) -> String {
    let layout = SceneLayout::default();
    let mut body = topbar(false);
    body.push_str(r#"<div id="container"></div><div id="tiles" hidden>"#);
    for record in dataset.ordered() {
        let tile = render_tile(record, Caption::Mass, selection).at(layout.position(record));
        body.push_str(&tile.to_html());
    }
    body.push_str(
        r#"</div>
<div id="elementInfo" class="hidden">
  <h2 id="elName"></h2>
  <div id="elSymbol"></div>
  <div id="elNumber"></div>
  <button id="viewMore" class="nav-btn">View more</button>
</div>"#,
    );
    let select = storage_select_script();
    document("Periodic Table", &body, &[select.as_str(), CSS3D_TABLE])
}

pub fn detail_page(page: &DetailPage) -> Result<String, serde_json::Error> {
    let mut body = topbar(true);
    body.push_str(r#"<div class="page" id="detail-page">"#);
    body.push_str(&page.to_html()?);
    body.push_str("</div>");
    let title = match page {
        DetailPage::Found(view) => format!("{} - Periodic Table", view.name),
        DetailPage::NotFound => "Element not found - Periodic Table".to_string(),
    };
    let guard = scene_host_guard_script();
    let host = scene_host_script();
    Ok(document(&title, &body, &[guard.as_str(), host.as_str()]))
}

/// Detail shell for storage mode: the selection is only known to the browser.
pub fn storage_detail_page() -> String {
    let mut body = topbar(true);
    body.push_str(r#"<div class="page" id="detail-page"></div>"#);
    let loader = STORAGE_DETAIL
        .replace("__SLOT__", STORAGE_SLOT)
        .replace("__NOT_FOUND__", &not_found_html())
        .replace("__FETCH_FAILED__", &format!("{FETCH_FAILED_MESSAGE:?}"));
    let guard = scene_host_guard_script();
    let host = scene_host_script();
    document(
        "Element - Periodic Table",
        &body,
        &[guard.as_str(), loader.as_str(), host.as_str()],
    )
}

fn scene_host_script() -> String {
    SCENE_HOST.replace("__WEBGL_MISSING__", WEBGL_MISSING_MESSAGE)
}

fn scene_host_guard_script() -> String {
    SCENE_HOST_GUARD.replace("__HOST_FAILED__", SCENE_HOST_FAILED_MESSAGE)
}

/// Shown when the dataset could not be loaded. Blocks with an alert once.
pub fn fetch_failed_page() -> String {
    let mut body = topbar(false);
    body.push_str(&format!(
        r#"<div class="page"><p class="fallback">{}</p></div>"#,
        escape(FETCH_FAILED_MESSAGE)
    ));
    let alert = format!("<script>window.alert({:?});</script>", FETCH_FAILED_MESSAGE);
    document("Periodic Table", &body, &[alert.as_str()])
}
